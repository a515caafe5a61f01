//! Report generator configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Attempts per model before moving to the fallback.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Backoff before attempt `n + 1` is `backoff_ms * 2^(n - 1)`.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    1000
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

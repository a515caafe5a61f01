//! Lookup client configuration.

use serde::{Deserialize, Serialize};

/// Files-listing endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Endpoint base; the work-order identifier is appended as a path segment.
    pub base_url: String,
    /// Value sent in the `x-api-key` header.
    #[serde(default)]
    pub api_key: String,
    /// Value sent in the `User-Agent` header.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_user_agent() -> String {
    "curl/8.0.1".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl LookupConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal() {
        let toml = r#"
            base_url = "https://api.test/GetFiles"
        "#;
        let config: LookupConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.base_url, "https://api.test/GetFiles");
        assert!(config.api_key.is_empty());
        assert_eq!(config.user_agent, "curl/8.0.1");
        assert_eq!(config.timeout_secs, 30);
    }
}

//! Harvest configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What the coordinator does once the found-quota is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopMode {
    /// Units not yet started are dropped; in-flight units finish and are
    /// awaited before the run returns.
    #[default]
    Cancel,

    /// Every unit is queued up front. The coordinator stops waiting on
    /// completions and detaches whatever is still queued or running.
    BestEffort,
}

impl StopMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopMode::Cancel => "cancel",
            StopMode::BestEffort => "best_effort",
        }
    }
}

/// Configuration for a harvest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// File listing one work-order identifier per line.
    #[serde(default = "default_identifiers_path")]
    pub identifiers_path: PathBuf,

    /// Directory receiving the harvested files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Maximum units (lookup + persist) running concurrently.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Stop after this many work orders with files (0 = no quota).
    #[serde(default = "default_quota")]
    pub quota: usize,

    /// Identifiers to skip from the start of the list (resume offset).
    #[serde(default)]
    pub skip: usize,

    /// Early-stop behavior.
    #[serde(default)]
    pub stop_mode: StopMode,

    /// Where to write Prometheus metrics after the run, if anywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_path: Option<PathBuf>,
}

fn default_identifiers_path() -> PathBuf {
    PathBuf::from("workorders.txt")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("downloaded_files")
}

fn default_workers() -> usize {
    10
}

fn default_quota() -> usize {
    20
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            identifiers_path: default_identifiers_path(),
            output_dir: default_output_dir(),
            workers: default_workers(),
            quota: default_quota(),
            skip: 0,
            stop_mode: StopMode::default(),
            metrics_path: None,
        }
    }
}

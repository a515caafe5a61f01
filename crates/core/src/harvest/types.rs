//! Harvest types.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::source::{SourceError, WorkOrderId};

/// Fatal harvest errors. Raised only before any unit is dispatched.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Cannot prepare output directory {path}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Counter values at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HarvestCounters {
    /// Work orders whose lookup completed, with or without files.
    pub processed: usize,
    /// Work orders whose lookup yielded at least one file.
    pub found: usize,
    /// Work orders whose lookup could not obtain a structured response.
    pub unavailable: usize,
}

/// Observation emitted after each unit's counter update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarvestProgress {
    pub work_order: WorkOrderId,
    /// Number of descriptors returned by the lookup.
    pub file_count: usize,
    /// Lookup outcome label: "found", "no_files" or "unavailable".
    pub outcome: &'static str,
    /// Failure reason for unavailable lookups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub found: usize,
    pub processed: usize,
    pub quota: usize,
}

/// Result of a harvest run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarvestSummary {
    /// Identifiers handed to the run.
    pub total: usize,
    pub processed: usize,
    pub found: usize,
    pub unavailable: usize,
    pub files_written: u64,
    pub files_skipped: u64,
    pub files_empty: u64,
    pub bytes_written: u64,
    /// Whether the found-quota ended the run.
    pub quota_reached: bool,
    pub elapsed_ms: u64,
}

//! Work-order identifier source.
//!
//! Identifiers come from a flat text file, one per line. Lines are trimmed
//! and blank lines dropped before the resume offset is applied.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque identifier of a single work order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkOrderId(String);

impl WorkOrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkOrderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for WorkOrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Identifier source unavailable: {path}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load identifiers from a file, skipping the first `skip` non-blank entries.
pub async fn load_identifiers(path: &Path, skip: usize) -> Result<Vec<WorkOrderId>, SourceError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SourceError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(parse_identifiers(&text, skip))
}

/// Parse identifiers from text, one per line.
pub fn parse_identifiers(text: &str, skip: usize) -> Vec<WorkOrderId> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .skip(skip)
        .map(WorkOrderId::new)
        .collect()
}

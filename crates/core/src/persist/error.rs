//! Error types for the persist module.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors retrieving a URL-sourced file.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Server answered with a non-success status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// Request did not complete in time.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Connection, DNS or body transfer failure.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Errors persisting a single descriptor. Never fatal to the harvest.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Download failed.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Inline content is not valid base64.
    #[error("Invalid base64 content: {0}")]
    Decode(String),

    /// Work-order identifier cannot form a file name inside the output
    /// directory (separators, root or parent components).
    #[error("Unsafe output file name: {0}")]
    UnsafeName(String),

    /// Writing the output file failed.
    #[error("Failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PersistError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Decode(_) => "decode",
            Self::UnsafeName(_) => "unsafe_name",
            Self::Write { .. } => "write",
        }
    }
}

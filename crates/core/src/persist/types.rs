//! Types describing what the persister did for one work order.

use std::path::PathBuf;

use super::error::PersistError;
use crate::source::WorkOrderId;

/// A file written to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub ordinal: usize,
    pub path: PathBuf,
    pub bytes: u64,
}

/// A descriptor that could not be persisted.
#[derive(Debug)]
pub struct SkippedFile {
    pub ordinal: usize,
    pub error: PersistError,
}

/// Outcome of persisting all descriptors of one work order.
#[derive(Debug)]
pub struct PersistReport {
    pub work_order: WorkOrderId,
    /// Files written, in descriptor order.
    pub written: Vec<WrittenFile>,
    /// Descriptors whose retrieval, decoding or write failed.
    pub skipped: Vec<SkippedFile>,
    /// Descriptors carrying neither a URL nor inline content.
    pub empty: usize,
}

impl PersistReport {
    pub fn new(work_order: WorkOrderId) -> Self {
        Self {
            work_order,
            written: Vec::new(),
            skipped: Vec::new(),
            empty: 0,
        }
    }

    /// Total bytes written.
    pub fn total_bytes(&self) -> u64 {
        self.written.iter().map(|f| f.bytes).sum()
    }

    /// True when no descriptor was skipped because of an error.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

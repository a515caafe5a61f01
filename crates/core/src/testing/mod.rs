//! Testing utilities and mock implementations.
//!
//! Mocks for every external seam of a harvest run, so the coordinator can be
//! exercised without a lookup API, file hosts or a report model.
//!
//! # Example
//!
//! ```rust,ignore
//! use harvester_core::testing::{fixtures, MockFetcher, MockLookup};
//!
//! let lookup = MockLookup::new();
//! lookup.set_outcome("A", fixtures::found(vec![fixtures::url_file(0, "https://files.test/a.jpg")])).await;
//!
//! let fetcher = MockFetcher::new();
//! fetcher.set_response("https://files.test/a.jpg", b"jpeg".to_vec()).await;
//! ```

mod mock_fetcher;
mod mock_lookup;
mod mock_report_model;

pub use mock_fetcher::MockFetcher;
pub use mock_lookup::MockLookup;
pub use mock_report_model::MockReportModel;

/// Test fixtures and helper functions.
pub mod fixtures {
    use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
    use base64::Engine;

    use crate::lookup::{FileDescriptor, LookupError, LookupOutcome};
    use crate::source::WorkOrderId;

    /// Descriptor pointing at a remote file.
    pub fn url_file(ordinal: usize, url: &str) -> FileDescriptor {
        FileDescriptor::from_url(ordinal, url)
    }

    /// Descriptor carrying `bytes` inline as base64.
    pub fn inline_file(ordinal: usize, bytes: &[u8]) -> FileDescriptor {
        FileDescriptor::from_content(ordinal, BASE64_STANDARD.encode(bytes))
    }

    pub fn found(files: Vec<FileDescriptor>) -> LookupOutcome {
        LookupOutcome::Found(files)
    }

    pub fn unavailable_status(status: u16) -> LookupOutcome {
        LookupOutcome::Unavailable(LookupError::Status(status))
    }

    /// Identifiers from string literals, in order.
    pub fn work_orders(ids: &[&str]) -> Vec<WorkOrderId> {
        ids.iter().map(|id| WorkOrderId::from(*id)).collect()
    }
}

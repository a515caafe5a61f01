//! Remote lookup of the files attached to a work order.
//!
//! The `WorkOrderLookup` trait is the seam between the harvest coordinator
//! and the files-listing endpoint. `HttpLookupClient` is the production
//! implementation; `testing::MockLookup` scripts outcomes for tests.
//!
//! Lookups never fail. Transport errors, timeouts, non-200 statuses and
//! non-JSON bodies are classified as `LookupOutcome::Unavailable`, while a
//! decoded response without files is `LookupOutcome::NoFiles`.

mod config;
mod http;
mod traits;
mod types;

pub use config::LookupConfig;
pub use http::HttpLookupClient;
pub use traits::WorkOrderLookup;
pub use types::{
    normalize_files, FileDescriptor, LookupError, LookupOutcome, LookupResult, FILE_CONTENT_KEY,
    FILE_URL_KEY,
};

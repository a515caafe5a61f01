//! Persister module for writing work-order files to local storage.
//!
//! Each descriptor is either downloaded (`FileFetcher`) or base64-decoded,
//! then written to `{output_dir}/{work_order}_{ordinal}{ext}`.
//!
//! # Example
//!
//! ```ignore
//! use harvester_core::persist::{FetchConfig, FilePersister, HttpFileFetcher};
//!
//! let fetcher = HttpFileFetcher::new(FetchConfig::default())?;
//! let persister = FilePersister::new(fetcher, "downloaded_files");
//!
//! let report = persister.persist(&work_order, &descriptors).await;
//! println!("Wrote {} files ({} bytes)", report.written.len(), report.total_bytes());
//! ```

mod config;
mod error;
mod fetcher;
mod fs_persister;
mod types;

pub use config::FetchConfig;
pub use error::{FetchError, PersistError};
pub use fetcher::{FileFetcher, HttpFileFetcher};
pub use fs_persister::{
    extension_from_url, output_path, prepare_output_dir, FilePersister, DEFAULT_EXTENSION,
};
pub use types::{PersistReport, SkippedFile, WrittenFile};

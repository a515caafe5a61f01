//! Inspection report generation.
//!
//! A [`ReportModel`] turns uploaded inspection media, optionally grounded by a
//! confirmed [`WorkOrderContext`], into a written report. The
//! [`ReportGenerator`] retries transient model failures and falls back to a
//! secondary model when the primary is spent.
//!
//! # Example
//!
//! ```rust,ignore
//! use harvester_core::report::{ReportConfig, ReportGenerator, ReportRequest, MediaHandle};
//!
//! let generator = ReportGenerator::new(primary, ReportConfig::default())
//!     .with_fallback(fallback);
//! let request = ReportRequest::new(vec![MediaHandle::new(uri, "video/mp4")])
//!     .with_context(context);
//! let report = generator.generate(&request).await?;
//! ```

mod config;
mod generator;
mod traits;
mod types;

pub use config::ReportConfig;
pub use generator::ReportGenerator;
pub use traits::{ReportError, ReportModel};
pub use types::{MediaHandle, ReportRequest, WorkOrderContext, MAX_SUMMARY_TRADES};

//! Harvest coordinator.
//!
//! Drives an identifier list through the lookup client and the persister
//! with bounded concurrency, shared counters and a found-quota early stop.
//!
//! # Example
//!
//! ```ignore
//! use harvester_core::harvest::{HarvestConfig, Harvester};
//! use harvester_core::lookup::{HttpLookupClient, LookupConfig};
//! use harvester_core::persist::{FetchConfig, HttpFileFetcher};
//!
//! let lookup = HttpLookupClient::new(LookupConfig::new(base_url, api_key))?;
//! let fetcher = HttpFileFetcher::new(FetchConfig::default())?;
//!
//! let harvester = Harvester::new(HarvestConfig::default(), lookup, fetcher);
//! let summary = harvester.run_from_source().await?;
//! println!("{} of {} work orders had files", summary.found, summary.processed);
//! ```

mod config;
mod runner;
mod state;
mod types;

pub use config::{HarvestConfig, StopMode};
pub use runner::Harvester;
pub use state::{FileTotals, HarvestState};
pub use types::{HarvestCounters, HarvestError, HarvestProgress, HarvestSummary};

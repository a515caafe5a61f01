pub mod config;
pub mod harvest;
pub mod lookup;
pub mod metrics;
pub mod persist;
pub mod report;
pub mod source;
pub mod testing;
pub mod workorder_info;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use harvest::{HarvestConfig, HarvestError, HarvestProgress, HarvestSummary, Harvester, StopMode};
pub use lookup::{
    FileDescriptor, HttpLookupClient, LookupConfig, LookupError, LookupOutcome, LookupResult,
    WorkOrderLookup,
};
pub use persist::{FetchConfig, FileFetcher, FilePersister, HttpFileFetcher, PersistReport};
pub use report::{ReportError, ReportGenerator, ReportModel, ReportRequest, WorkOrderContext};
pub use source::{load_identifiers, SourceError, WorkOrderId};
pub use workorder_info::{WorkOrderInfoClient, WorkOrderInfoConfig, WorkOrderInfoError};

use serde::{Deserialize, Serialize};

use crate::harvest::HarvestConfig;
use crate::lookup::LookupConfig;
use crate::persist::FetchConfig;
use crate::workorder_info::WorkOrderInfoConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub lookup: LookupConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub harvest: HarvestConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_order_info: Option<WorkOrderInfoConfig>,
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub lookup: SanitizedLookupConfig,
    pub fetch: FetchConfig,
    pub harvest: HarvestConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_order_info: Option<WorkOrderInfoConfig>,
}

/// Sanitized lookup config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedLookupConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            lookup: SanitizedLookupConfig {
                base_url: config.lookup.base_url.clone(),
                api_key_configured: !config.lookup.api_key.is_empty(),
                user_agent: config.lookup.user_agent.clone(),
                timeout_secs: config.lookup.timeout_secs,
            },
            fetch: config.fetch.clone(),
            harvest: config.harvest.clone(),
            work_order_info: config.work_order_info.clone(),
        }
    }
}

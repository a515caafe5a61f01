use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Lookup section exists (enforced by serde) and has a base URL
/// - Worker pool width is not 0
/// - Timeouts are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.lookup.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "lookup.base_url cannot be empty".to_string(),
        ));
    }

    if config.lookup.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "lookup.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.fetch.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "fetch.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.harvest.workers == 0 {
        return Err(ConfigError::ValidationError(
            "harvest.workers cannot be 0".to_string(),
        ));
    }

    if let Some(info) = &config.work_order_info {
        if info.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "work_order_info.timeout_secs cannot be 0".to_string(),
            ));
        }
    }

    Ok(())
}

//! Report model trait and errors.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use super::types::ReportRequest;

/// Errors that can occur while generating a report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("Rate limited")]
    RateLimited,

    #[error("Model unavailable: {0}")]
    Unavailable(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Model returned an empty report")]
    EmptyResponse,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("All models exhausted after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },
}

impl ReportError {
    /// Whether retrying the same model may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::Unavailable(_) | Self::Timeout(_) | Self::EmptyResponse
        )
    }
}

/// A model that turns inspection media into a written report.
#[async_trait]
pub trait ReportModel: Send + Sync {
    /// Name of this model for logging.
    fn name(&self) -> &str;

    async fn generate(&self, request: &ReportRequest) -> Result<String, ReportError>;
}

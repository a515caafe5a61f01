//! Work-order confirmation client.
//!
//! Resolves a work-order number to the context used by inspection reports:
//! client description, entity and the trades attached to the job. Transient
//! failures (429, 5xx, transport errors) are retried with exponential
//! backoff.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::report::WorkOrderContext;

/// Statuses worth another attempt.
const RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Work-order confirmation endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrderInfoConfig {
    /// Endpoint queried with `?query={number}`.
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff before retry `n` is `backoff_factor_ms * 2^n`.
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor_ms: u64,
}

fn default_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_factor() -> u64 {
    500
}

impl WorkOrderInfoConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            backoff_factor_ms: default_backoff_factor(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkOrderInfoError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid work order number: {0}")]
    Invalid(String),
}

impl WorkOrderInfoError {
    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout(_) => true,
            Self::Api { status, .. } => RETRY_STATUSES.contains(status),
            Self::Parse(_) | Self::Invalid(_) => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfirmResponse {
    #[serde(default)]
    valid: bool,
    #[serde(default)]
    work_order_number: Option<String>,
    #[serde(default)]
    client_description: Option<String>,
    #[serde(default)]
    entity_name: Option<String>,
    #[serde(default)]
    trades: Vec<String>,
}

/// Work-order confirmation client.
pub struct WorkOrderInfoClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    backoff_factor: Duration,
}

impl WorkOrderInfoClient {
    pub fn new(config: WorkOrderInfoConfig) -> reqwest::Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url,
            timeout,
            max_retries: config.max_retries,
            backoff_factor: Duration::from_millis(config.backoff_factor_ms),
        })
    }

    /// Fetch the context of a work order, retrying transient failures.
    pub async fn fetch(&self, number: &str) -> Result<WorkOrderContext, WorkOrderInfoError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(number).await {
                Ok(context) => return Ok(context),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = self.backoff_factor * 2u32.saturating_pow(attempt);
                    warn!(
                        work_order = number,
                        attempt = attempt + 1,
                        "Work order info request failed, retrying in {:?}: {}",
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, number: &str) -> Result<WorkOrderContext, WorkOrderInfoError> {
        debug!("Work order info lookup: number='{}'", number);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("query", number)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    WorkOrderInfoError::Timeout(self.timeout)
                } else {
                    WorkOrderInfoError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = response.text().await.unwrap_or_default();
            return Err(WorkOrderInfoError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ConfirmResponse = response
            .json()
            .await
            .map_err(|e| WorkOrderInfoError::Parse(e.to_string()))?;

        if !body.valid {
            return Err(WorkOrderInfoError::Invalid(number.to_string()));
        }

        Ok(WorkOrderContext {
            number: body.work_order_number.unwrap_or_else(|| number.to_string()),
            description: body.client_description,
            entity: body.entity_name,
            trades: body.trades,
        })
    }
}

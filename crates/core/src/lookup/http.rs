//! HTTP lookup client for the files-listing endpoint.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::config::LookupConfig;
use super::traits::WorkOrderLookup;
use super::types::{normalize_files, FileDescriptor, LookupError, LookupOutcome, LookupResult};
use crate::metrics::LOOKUP_DURATION;
use crate::source::WorkOrderId;

/// Bytes of the response body included in debug logs.
const PREVIEW_BYTES: usize = 200;

/// Files-listing client.
///
/// Issues `POST {base_url}/{work_order}` with the configured API key and
/// user agent. Every failure mode is classified, never raised.
pub struct HttpLookupClient {
    client: Client,
    base_url: String,
    api_key: String,
    user_agent: String,
    timeout: Duration,
}

impl HttpLookupClient {
    /// Create a new lookup client.
    pub fn new(config: LookupConfig) -> reqwest::Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            user_agent: config.user_agent,
            timeout,
        })
    }

    /// URL queried for a work order.
    pub fn endpoint(&self, work_order: &WorkOrderId) -> String {
        format!(
            "{}/{}",
            self.base_url,
            urlencoding::encode(work_order.as_str())
        )
    }

    fn transport_error(&self, error: reqwest::Error) -> LookupError {
        if error.is_timeout() {
            LookupError::Timeout(self.timeout)
        } else {
            LookupError::Transport(error.to_string())
        }
    }

    async fn fetch_files(&self, work_order: &WorkOrderId) -> Result<Vec<FileDescriptor>, LookupError> {
        let response = self
            .client
            .post(self.endpoint(work_order))
            .header("x-api-key", &self.api_key)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "*/*")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;

        debug!(
            work_order = %work_order,
            status = status.as_u16(),
            preview = %String::from_utf8_lossy(&body[..body.len().min(PREVIEW_BYTES)]),
            "Lookup response"
        );

        if status != StatusCode::OK {
            return Err(LookupError::Status(status.as_u16()));
        }
        if body.trim_ascii().is_empty() {
            return Err(LookupError::EmptyBody);
        }
        if !content_type.contains("application/json") {
            return Err(LookupError::NotJson { content_type });
        }

        let value: Value =
            serde_json::from_slice(&body).map_err(|e| LookupError::Decode(e.to_string()))?;

        Ok(normalize_files(&value))
    }
}

#[async_trait]
impl WorkOrderLookup for HttpLookupClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn lookup(&self, work_order: &WorkOrderId) -> LookupResult {
        let start = Instant::now();

        let outcome = match self.fetch_files(work_order).await {
            Ok(files) => LookupOutcome::from_files(files),
            Err(e) => LookupOutcome::Unavailable(e),
        };

        LOOKUP_DURATION
            .with_label_values(&[outcome.kind()])
            .observe(start.elapsed().as_secs_f64());

        LookupResult::new(work_order.clone(), outcome)
    }
}

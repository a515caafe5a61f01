//! Retrieval of URL-sourced files.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::config::FetchConfig;
use super::error::FetchError;

/// Downloads the raw bytes behind a file URL.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// Fetches the body of `url`. Any non-2xx status is an error.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Plain `GET` fetcher with a fixed timeout.
pub struct HttpFileFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFileFetcher {
    pub fn new(config: FetchConfig) -> reqwest::Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    fn classify(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl FileFetcher for HttpFileFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        Ok(body.to_vec())
    }
}

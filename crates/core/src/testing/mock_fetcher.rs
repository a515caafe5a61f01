//! Mock file fetcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::persist::{FetchError, FileFetcher};

/// Mock implementation of the FileFetcher trait.
///
/// Unscripted URLs fail with `FetchError::Status(404)`.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    /// Scripted results by URL.
    responses: Arc<RwLock<HashMap<String, Result<Vec<u8>, FetchError>>>>,
    /// URLs fetched, in call order.
    fetched: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create a new mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub async fn set_response(&self, url: impl Into<String>, body: Vec<u8>) {
        self.responses.write().await.insert(url.into(), Ok(body));
    }

    /// Fail requests for `url` with `error`.
    pub async fn set_error(&self, url: impl Into<String>, error: FetchError) {
        self.responses.write().await.insert(url.into(), Err(error));
    }

    /// Get all fetched URLs.
    pub async fn fetched_urls(&self) -> Vec<String> {
        self.fetched.read().await.clone()
    }
}

#[async_trait]
impl FileFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.fetched.write().await.push(url.to_string());
        self.responses
            .read()
            .await
            .get(url)
            .cloned()
            .unwrap_or(Err(FetchError::Status(404)))
    }
}

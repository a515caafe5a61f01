//! Mock report model for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::report::{ReportError, ReportModel, ReportRequest};

/// Mock implementation of the ReportModel trait.
///
/// Responses are consumed in the order they were pushed. Once the queue is
/// empty every call fails with `ReportError::Unavailable`.
#[derive(Debug, Clone)]
pub struct MockReportModel {
    name: String,
    responses: Arc<RwLock<VecDeque<Result<String, ReportError>>>>,
    requests: Arc<RwLock<Vec<ReportRequest>>>,
}

impl MockReportModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: Arc::new(RwLock::new(VecDeque::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Queue the result of the next call.
    pub async fn push_response(&self, response: Result<String, ReportError>) {
        self.responses.write().await.push_back(response);
    }

    /// Get all received requests.
    pub async fn requests(&self) -> Vec<ReportRequest> {
        self.requests.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl ReportModel for MockReportModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &ReportRequest) -> Result<String, ReportError> {
        self.requests.write().await.push(request.clone());
        self.responses
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(ReportError::Unavailable("no scripted response".into())))
    }
}

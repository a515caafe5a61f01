//! Report generation with retry and model fallback.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::config::ReportConfig;
use super::traits::{ReportError, ReportModel};
use super::types::ReportRequest;

/// Runs a primary model and, once it is spent, an optional fallback.
pub struct ReportGenerator {
    primary: Arc<dyn ReportModel>,
    fallback: Option<Arc<dyn ReportModel>>,
    config: ReportConfig,
}

impl ReportGenerator {
    pub fn new(primary: Arc<dyn ReportModel>, config: ReportConfig) -> Self {
        Self {
            primary,
            fallback: None,
            config,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn ReportModel>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub async fn generate(&self, request: &ReportRequest) -> Result<String, ReportError> {
        if request.media.is_empty() {
            return Err(ReportError::InvalidRequest("no media provided".to_string()));
        }

        let max_attempts = self.config.max_attempts.max(1);
        let backoff = Duration::from_millis(self.config.backoff_ms);
        let models = std::iter::once(&self.primary).chain(self.fallback.as_ref());

        let mut attempts = 0;
        let mut last_error: Option<ReportError> = None;

        for model in models {
            for attempt in 0..max_attempts {
                attempts += 1;
                let error = match model.generate(request).await {
                    Ok(text) if !text.trim().is_empty() => {
                        info!(
                            model = model.name(),
                            attempts, "Report generated ({} chars)",
                            text.len()
                        );
                        return Ok(text);
                    }
                    Ok(_) => ReportError::EmptyResponse,
                    Err(e) => e,
                };

                warn!(
                    model = model.name(),
                    attempt = attempt + 1,
                    "Report generation failed: {}",
                    error
                );

                let transient = error.is_transient();
                last_error = Some(error);
                if !transient || attempt + 1 == max_attempts {
                    break;
                }
                tokio::time::sleep(backoff * 2u32.saturating_pow(attempt)).await;
            }
        }

        Err(ReportError::Exhausted {
            attempts,
            last: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MediaHandle;
    use crate::testing::MockReportModel;

    fn config() -> ReportConfig {
        ReportConfig {
            max_attempts: 3,
            backoff_ms: 1,
        }
    }

    fn request() -> ReportRequest {
        ReportRequest::new(vec![MediaHandle::new("files/abc", "video/mp4")])
    }

    #[tokio::test]
    async fn test_primary_succeeds_first_try() {
        let primary = MockReportModel::new("primary");
        primary.push_response(Ok("ISSUE TYPE: leak".into())).await;

        let generator = ReportGenerator::new(Arc::new(primary.clone()), config());
        let report = generator.generate(&request()).await.unwrap();

        assert_eq!(report, "ISSUE TYPE: leak");
        assert_eq!(primary.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_transient_errors_are_retried() {
        let primary = MockReportModel::new("primary");
        primary.push_response(Err(ReportError::RateLimited)).await;
        primary.push_response(Ok(" ".into())).await;
        primary.push_response(Ok("report".into())).await;

        let generator = ReportGenerator::new(Arc::new(primary.clone()), config());
        let report = generator.generate(&request()).await.unwrap();

        assert_eq!(report, "report");
        assert_eq!(primary.call_count().await, 3);
    }

    #[tokio::test]
    async fn test_falls_back_after_retries_spent() {
        let primary = MockReportModel::new("primary");
        for _ in 0..3 {
            primary
                .push_response(Err(ReportError::Unavailable("503".into())))
                .await;
        }
        let fallback = MockReportModel::new("fallback");
        fallback.push_response(Ok("fallback report".into())).await;

        let generator = ReportGenerator::new(Arc::new(primary.clone()), config())
            .with_fallback(Arc::new(fallback.clone()));
        let report = generator.generate(&request()).await.unwrap();

        assert_eq!(report, "fallback report");
        assert_eq!(primary.call_count().await, 3);
        assert_eq!(fallback.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_non_transient_error_skips_retries() {
        let primary = MockReportModel::new("primary");
        primary
            .push_response(Err(ReportError::InvalidRequest("bad mime".into())))
            .await;
        let fallback = MockReportModel::new("fallback");
        fallback.push_response(Ok("ok".into())).await;

        let generator = ReportGenerator::new(Arc::new(primary.clone()), config())
            .with_fallback(Arc::new(fallback.clone()));
        generator.generate(&request()).await.unwrap();

        assert_eq!(primary.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_exhausted_when_everything_fails() {
        let primary = MockReportModel::new("primary");
        let fallback = MockReportModel::new("fallback");
        for _ in 0..3 {
            primary.push_response(Err(ReportError::RateLimited)).await;
            fallback
                .push_response(Err(ReportError::Timeout(Duration::from_secs(60))))
                .await;
        }

        let generator = ReportGenerator::new(Arc::new(primary), config())
            .with_fallback(Arc::new(fallback));
        let err = generator.generate(&request()).await.unwrap_err();

        match err {
            ReportError::Exhausted { attempts, last } => {
                assert_eq!(attempts, 6);
                assert!(last.contains("Timeout"));
            }
            other => panic!("expected Exhausted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_context_reaches_model() {
        let primary = MockReportModel::new("primary");
        primary.push_response(Ok("report".into())).await;

        let context = crate::report::WorkOrderContext::new("WO-9").with_trades(["Roofing"]);
        let generator = ReportGenerator::new(Arc::new(primary.clone()), config());
        generator
            .generate(&request().with_context(context.clone()))
            .await
            .unwrap();

        let requests = primary.requests().await;
        assert_eq!(requests[0].context.as_ref(), Some(&context));
    }

    #[tokio::test]
    async fn test_empty_media_rejected() {
        let primary = MockReportModel::new("primary");
        let generator = ReportGenerator::new(Arc::new(primary.clone()), config());

        let err = generator
            .generate(&ReportRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidRequest(_)));
        assert_eq!(primary.call_count().await, 0);
    }
}

//! Shared harvest state.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, Mutex};
use tracing::{info, warn};

use super::types::{HarvestCounters, HarvestProgress};
use crate::lookup::{LookupOutcome, LookupResult};
use crate::persist::PersistReport;

/// Counters shared by every unit of a run.
///
/// All read-modify-write sequences, and the progress observation that
/// follows them, happen under the single lock.
pub struct HarvestState {
    quota: usize,
    counters: Mutex<HarvestCounters>,
}

impl HarvestState {
    pub fn new(quota: usize) -> Self {
        Self {
            quota,
            counters: Mutex::new(HarvestCounters::default()),
        }
    }

    pub fn quota(&self) -> usize {
        self.quota
    }

    /// Records one completed lookup and emits its progress observation.
    pub async fn record(
        &self,
        result: &LookupResult,
        progress_tx: Option<&mpsc::UnboundedSender<HarvestProgress>>,
    ) -> HarvestProgress {
        let mut counters = self.counters.lock().await;

        counters.processed += 1;
        if result.has_files() {
            counters.found += 1;
        }
        if result.is_unavailable() {
            counters.unavailable += 1;
        }

        let progress = HarvestProgress {
            work_order: result.work_order.clone(),
            file_count: result.files().len(),
            outcome: result.outcome.kind(),
            reason: match &result.outcome {
                LookupOutcome::Unavailable(e) => Some(e.to_string()),
                _ => None,
            },
            found: counters.found,
            processed: counters.processed,
            quota: self.quota,
        };

        match &result.outcome {
            LookupOutcome::Found(files) => info!(
                "{}: {} files found (found: {}/{}, processed: {})",
                progress.work_order,
                files.len(),
                progress.found,
                self.quota,
                progress.processed
            ),
            LookupOutcome::NoFiles => info!(
                "{}: no files (found: {}/{}, processed: {})",
                progress.work_order, progress.found, self.quota, progress.processed
            ),
            LookupOutcome::Unavailable(e) => warn!(
                "{}: lookup unavailable: {} (found: {}/{}, processed: {})",
                progress.work_order, e, progress.found, self.quota, progress.processed
            ),
        }

        if let Some(tx) = progress_tx {
            // Receiver may be gone; observation is best-effort
            let _ = tx.send(progress.clone());
        }

        progress
    }

    /// Whether the found-quota has been reached. A zero quota never is.
    pub async fn quota_reached(&self) -> bool {
        let counters = self.counters.lock().await;
        self.quota > 0 && counters.found >= self.quota
    }

    pub async fn snapshot(&self) -> HarvestCounters {
        *self.counters.lock().await
    }
}

/// File totals accumulated from persist reports.
#[derive(Default)]
pub struct FileTotals {
    written: AtomicU64,
    skipped: AtomicU64,
    empty: AtomicU64,
    bytes: AtomicU64,
}

impl FileTotals {
    pub fn add(&self, report: &PersistReport) {
        self.written
            .fetch_add(report.written.len() as u64, Ordering::Relaxed);
        self.skipped
            .fetch_add(report.skipped.len() as u64, Ordering::Relaxed);
        self.empty.fetch_add(report.empty as u64, Ordering::Relaxed);
        self.bytes.fetch_add(report.total_bytes(), Ordering::Relaxed);
    }

    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    pub fn empty(&self) -> u64 {
        self.empty.load(Ordering::Relaxed)
    }

    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{FileDescriptor, LookupError};
    use crate::source::WorkOrderId;

    fn found(id: &str) -> LookupResult {
        LookupResult::new(
            WorkOrderId::from(id),
            LookupOutcome::Found(vec![FileDescriptor::from_content(0, "Zm9v")]),
        )
    }

    fn unavailable(id: &str) -> LookupResult {
        LookupResult::new(
            WorkOrderId::from(id),
            LookupOutcome::Unavailable(LookupError::Status(500)),
        )
    }

    #[tokio::test]
    async fn test_record_updates_counters() {
        let state = HarvestState::new(2);

        let first = state.record(&unavailable("X"), None).await;
        assert_eq!(first.processed, 1);
        assert_eq!(first.found, 0);
        assert_eq!(first.outcome, "unavailable");
        assert_eq!(first.reason.as_deref(), Some("Unexpected HTTP status 500"));

        let second = state.record(&found("A"), None).await;
        assert_eq!(second.processed, 2);
        assert_eq!(second.found, 1);
        assert_eq!(second.file_count, 1);
        assert!(!state.quota_reached().await);

        state.record(&found("B"), None).await;
        assert!(state.quota_reached().await);

        let counters = state.snapshot().await;
        assert_eq!(
            counters,
            HarvestCounters {
                processed: 3,
                found: 2,
                unavailable: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_zero_quota_never_reached() {
        let state = HarvestState::new(0);
        state.record(&found("A"), None).await;
        assert!(!state.quota_reached().await);
    }

    #[tokio::test]
    async fn test_progress_sent_to_channel() {
        let state = HarvestState::new(1);
        let (tx, mut rx) = mpsc::unbounded_channel();

        state.record(&found("A"), Some(&tx)).await;

        let progress = rx.recv().await.unwrap();
        assert_eq!(progress.work_order, WorkOrderId::from("A"));
        assert_eq!(progress.found, 1);
        assert_eq!(progress.quota, 1);
    }

    #[tokio::test]
    async fn test_dropped_receiver_is_ignored() {
        let state = HarvestState::new(1);
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let progress = state.record(&found("A"), Some(&tx)).await;
        assert_eq!(progress.processed, 1);
    }
}

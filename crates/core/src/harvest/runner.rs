//! Harvest coordinator implementation.
//!
//! Drives an identifier list through a fixed-width worker pool:
//! - Each unit looks up one work order, records the outcome under the shared
//!   lock and persists the files it found.
//! - Concurrency is bounded by a semaphore with `workers` permits.
//! - The found-quota ends the run according to the configured `StopMode`.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info};

use super::config::{HarvestConfig, StopMode};
use super::state::{FileTotals, HarvestState};
use super::types::{HarvestError, HarvestProgress, HarvestSummary};
use crate::lookup::WorkOrderLookup;
use crate::metrics::{LOOKUPS_TOTAL, RUNS_TOTAL};
use crate::persist::{prepare_output_dir, FileFetcher, FilePersister};
use crate::source::{load_identifiers, WorkOrderId};

/// Everything a unit needs, cloned into each spawned task.
struct Worker<L: WorkOrderLookup, F: FileFetcher> {
    lookup: Arc<L>,
    persister: Arc<FilePersister<F>>,
    state: Arc<HarvestState>,
    totals: Arc<FileTotals>,
    progress_tx: Option<mpsc::UnboundedSender<HarvestProgress>>,
}

impl<L: WorkOrderLookup, F: FileFetcher> Clone for Worker<L, F> {
    fn clone(&self) -> Self {
        Self {
            lookup: Arc::clone(&self.lookup),
            persister: Arc::clone(&self.persister),
            state: Arc::clone(&self.state),
            totals: Arc::clone(&self.totals),
            progress_tx: self.progress_tx.clone(),
        }
    }
}

impl<L: WorkOrderLookup, F: FileFetcher> Worker<L, F> {
    /// One unit of work: lookup, record, then persist if files were found.
    async fn process(self, work_order: WorkOrderId) {
        let result = self.lookup.lookup(&work_order).await;
        LOOKUPS_TOTAL
            .with_label_values(&[result.outcome.kind()])
            .inc();

        self.state
            .record(&result, self.progress_tx.as_ref())
            .await;

        if result.has_files() {
            let report = self.persister.persist(&work_order, result.files()).await;
            debug!(
                work_order = %work_order,
                written = report.written.len(),
                skipped = report.skipped.len(),
                empty = report.empty,
                "Persisted work order"
            );
            self.totals.add(&report);
        }
    }
}

/// The harvest coordinator.
pub struct Harvester<L: WorkOrderLookup, F: FileFetcher> {
    config: HarvestConfig,
    lookup: Arc<L>,
    persister: Arc<FilePersister<F>>,
    progress_tx: Option<mpsc::UnboundedSender<HarvestProgress>>,
}

impl<L: WorkOrderLookup + 'static, F: FileFetcher + 'static> Harvester<L, F> {
    /// Creates a harvester writing into `config.output_dir`.
    pub fn new(config: HarvestConfig, lookup: L, fetcher: F) -> Self {
        let persister = FilePersister::new(fetcher, config.output_dir.clone());
        Self {
            config,
            lookup: Arc::new(lookup),
            persister: Arc::new(persister),
            progress_tx: None,
        }
    }

    /// Sends every progress observation to `tx` as well as to the log.
    pub fn with_progress(mut self, tx: mpsc::UnboundedSender<HarvestProgress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Loads `config.identifiers_path` (after `config.skip`) and runs.
    pub async fn run_from_source(&self) -> Result<HarvestSummary, HarvestError> {
        let identifiers = load_identifiers(&self.config.identifiers_path, self.config.skip).await?;
        info!(
            "Loaded {} work orders from {:?} (skipped {})",
            identifiers.len(),
            self.config.identifiers_path,
            self.config.skip
        );
        self.run(identifiers).await
    }

    /// Runs one harvest over `identifiers`.
    ///
    /// Only output directory preparation can fail; every per-identifier and
    /// per-file failure is absorbed into the summary.
    pub async fn run(&self, identifiers: Vec<WorkOrderId>) -> Result<HarvestSummary, HarvestError> {
        let output_dir = self.persister.output_dir();
        prepare_output_dir(output_dir)
            .await
            .map_err(|source| HarvestError::OutputDir {
                path: output_dir.to_path_buf(),
                source,
            })?;

        let start = Instant::now();
        let total = identifiers.len();
        let worker = Worker {
            lookup: Arc::clone(&self.lookup),
            persister: Arc::clone(&self.persister),
            state: Arc::new(HarvestState::new(self.config.quota)),
            totals: Arc::new(FileTotals::default()),
            progress_tx: self.progress_tx.clone(),
        };

        info!(
            total,
            workers = self.config.workers,
            quota = self.config.quota,
            mode = self.config.stop_mode.as_str(),
            lookup = self.lookup.name(),
            "Starting harvest"
        );

        match self.config.stop_mode {
            StopMode::Cancel => self.dispatch_cancellable(identifiers, &worker).await,
            StopMode::BestEffort => self.dispatch_best_effort(identifiers, &worker).await,
        }

        let counters = worker.state.snapshot().await;
        let quota_reached = worker.state.quota_reached().await;
        RUNS_TOTAL
            .with_label_values(&[if quota_reached { "quota_reached" } else { "exhausted" }])
            .inc();

        let summary = HarvestSummary {
            total,
            processed: counters.processed,
            found: counters.found,
            unavailable: counters.unavailable,
            files_written: worker.totals.written(),
            files_skipped: worker.totals.skipped(),
            files_empty: worker.totals.empty(),
            bytes_written: worker.totals.bytes(),
            quota_reached,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            processed = summary.processed,
            found = summary.found,
            unavailable = summary.unavailable,
            files_written = summary.files_written,
            quota_reached,
            "Harvest finished in {}ms",
            summary.elapsed_ms
        );

        Ok(summary)
    }

    fn pool_width(&self) -> usize {
        self.config.workers.max(1)
    }

    /// Starts a unit only after a permit is free and the quota is still open,
    /// so queued work is dropped once the quota is reached.
    async fn dispatch_cancellable(&self, identifiers: Vec<WorkOrderId>, worker: &Worker<L, F>) {
        let semaphore = Arc::new(Semaphore::new(self.pool_width()));
        let mut tasks = JoinSet::new();
        let total = identifiers.len();

        for (dispatched, work_order) in identifiers.into_iter().enumerate() {
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };
            if worker.state.quota_reached().await {
                info!(
                    "Quota reached, dropping {} undispatched work orders",
                    total - dispatched
                );
                break;
            }

            let unit = worker.clone();
            tasks.spawn(async move {
                unit.process(work_order).await;
                drop(permit);
            });

            while let Some(joined) = tasks.try_join_next() {
                log_join_error(joined);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            log_join_error(joined);
        }
    }

    /// Queues every unit up front and stops waiting once the quota is
    /// observed. Remaining tasks are detached, not cancelled.
    async fn dispatch_best_effort(&self, identifiers: Vec<WorkOrderId>, worker: &Worker<L, F>) {
        let semaphore = Arc::new(Semaphore::new(self.pool_width()));
        let mut tasks = JoinSet::new();

        for work_order in identifiers {
            let semaphore = Arc::clone(&semaphore);
            let unit = worker.clone();
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                unit.process(work_order).await;
            });
        }

        while let Some(joined) = tasks.join_next().await {
            log_join_error(joined);
            if worker.state.quota_reached().await {
                info!(
                    "Quota reached, no longer waiting on {} outstanding units",
                    tasks.len()
                );
                tasks.detach_all();
                break;
            }
        }
    }
}

fn log_join_error(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        error!("Harvest unit failed: {}", e);
    }
}

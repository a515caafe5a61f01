//! Mock work-order lookup for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::lookup::{LookupOutcome, LookupResult, WorkOrderLookup};
use crate::source::WorkOrderId;

/// Mock implementation of the WorkOrderLookup trait.
///
/// Provides controllable behavior for testing:
/// - Scripted outcome per work order (unscripted ones return `NoFiles`)
/// - Per work order delays to shape completion order
/// - Recorded calls for assertions
///
/// # Example
///
/// ```rust,ignore
/// use harvester_core::testing::MockLookup;
///
/// let lookup = MockLookup::new();
/// lookup.set_outcome("A", LookupOutcome::NoFiles).await;
///
/// let result = lookup.lookup(&WorkOrderId::from("A")).await;
/// assert_eq!(lookup.call_count().await, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockLookup {
    /// Scripted outcomes by work order.
    outcomes: Arc<RwLock<HashMap<WorkOrderId, LookupOutcome>>>,
    /// Simulated latency by work order.
    delays: Arc<RwLock<HashMap<WorkOrderId, Duration>>>,
    /// Work orders looked up, in call order.
    calls: Arc<RwLock<Vec<WorkOrderId>>>,
}

impl MockLookup {
    /// Create a new mock lookup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome for a work order.
    pub async fn set_outcome(&self, work_order: impl Into<WorkOrderId>, outcome: LookupOutcome) {
        self.outcomes
            .write()
            .await
            .insert(work_order.into(), outcome);
    }

    /// Delay the lookup of a work order.
    pub async fn set_delay(&self, work_order: impl Into<WorkOrderId>, delay: Duration) {
        self.delays.write().await.insert(work_order.into(), delay);
    }

    /// Get all recorded calls.
    pub async fn calls(&self) -> Vec<WorkOrderId> {
        self.calls.read().await.clone()
    }

    /// Get the number of lookups performed.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl WorkOrderLookup for MockLookup {
    fn name(&self) -> &str {
        "mock"
    }

    async fn lookup(&self, work_order: &WorkOrderId) -> LookupResult {
        self.calls.write().await.push(work_order.clone());

        let delay = self.delays.read().await.get(work_order).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = self
            .outcomes
            .read()
            .await
            .get(work_order)
            .cloned()
            .unwrap_or(LookupOutcome::NoFiles);

        LookupResult::new(work_order.clone(), outcome)
    }
}

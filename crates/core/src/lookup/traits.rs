//! Trait definitions for the lookup module.

use async_trait::async_trait;

use super::types::LookupResult;
use crate::source::WorkOrderId;

/// Resolves a work order to the files attached to it.
///
/// Implementations never fail: every failure is classified into the
/// returned `LookupResult`.
#[async_trait]
pub trait WorkOrderLookup: Send + Sync {
    /// Returns the name of this lookup implementation.
    fn name(&self) -> &str;

    /// Looks up the files of a single work order. Exactly one attempt is made.
    async fn lookup(&self, work_order: &WorkOrderId) -> LookupResult;
}

//! Prometheus metrics for the harvester.
//!
//! This module provides metrics for:
//! - Lookups (outcomes, latency)
//! - Persisted files (by source and result)
//! - Harvest runs

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use tracing::warn;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    for metric in all_metrics() {
        if let Err(e) = registry.register(metric) {
            warn!("Failed to register metric: {}", e);
        }
    }
    registry
});

// =============================================================================
// Lookup Metrics
// =============================================================================

/// Lookups total by outcome.
pub static LOOKUPS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("harvest_lookups_total", "Total work-order lookups"),
        &["outcome"], // "found", "no_files", "unavailable"
    )
    .unwrap()
});

/// Lookup duration in seconds.
pub static LOOKUP_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "harvest_lookup_duration_seconds",
            "Duration of files-listing lookups",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["outcome"],
    )
    .unwrap()
});

// =============================================================================
// Persist Metrics
// =============================================================================

/// Files handled by the persister.
pub static FILES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("harvest_files_total", "Files handled by the persister"),
        &["source", "result"], // source: "url", "inline", "none"; result: "written", "skipped", "empty"
    )
    .unwrap()
});

/// Bytes written to the output directory.
pub static BYTES_WRITTEN: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("harvest_bytes_written_total", "Total bytes written").unwrap()
});

// =============================================================================
// Run Metrics
// =============================================================================

/// Harvest runs by how they ended.
pub static RUNS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("harvest_runs_total", "Total harvest runs"),
        &["result"], // "quota_reached", "exhausted"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(LOOKUPS_TOTAL.clone()),
        Box::new(LOOKUP_DURATION.clone()),
        Box::new(FILES_TOTAL.clone()),
        Box::new(BYTES_WRITTEN.clone()),
        Box::new(RUNS_TOTAL.clone()),
    ]
}

/// Render the registry in the Prometheus text exposition format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_includes_registered_metrics() {
        LOOKUPS_TOTAL.with_label_values(&["found"]).inc();
        FILES_TOTAL.with_label_values(&["inline", "written"]).inc();

        let text = encode_metrics();
        assert!(text.contains("harvest_lookups_total"));
        assert!(text.contains("harvest_files_total"));
    }
}

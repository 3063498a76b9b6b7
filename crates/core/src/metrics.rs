//! Prometheus metrics for the catalog.
//!
//! This module provides metrics for:
//! - Registration (items indexed)
//! - Ranking queries and keyword sampling
//! - Snapshot dump/load

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Catalog
// =============================================================================

/// Items inserted into the indices (registrations and snapshot loads).
pub static ITEMS_REGISTERED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("vidcat_items_registered_total", "Total items registered").unwrap()
});

/// Ranking queries by variant.
pub static RANKING_QUERIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("vidcat_ranking_queries_total", "Total ranking queries"),
        &["variant"], // "query", "slug", "title", "tags_models", "ngrams"
    )
    .unwrap()
});

/// Keyword draws that hit the retry cap before filling the request.
pub static KEYWORD_DRAWS_EXHAUSTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "vidcat_keyword_draws_exhausted_total",
            "Keyword draws stopped by the retry cap",
        ),
        &["pool"], // "general", "seo"
    )
    .unwrap()
});

// =============================================================================
// Snapshot
// =============================================================================

/// Snapshot operation duration in seconds.
pub static SNAPSHOT_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "vidcat_snapshot_duration_seconds",
            "Duration of snapshot dump/load",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0]),
        &["op"], // "dump", "load"
    )
    .unwrap()
});

/// Failed snapshot operations.
pub static SNAPSHOT_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("vidcat_snapshot_failures_total", "Total failed snapshot operations"),
        &["op"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all catalog metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(ITEMS_REGISTERED.clone()),
        Box::new(RANKING_QUERIES.clone()),
        Box::new(KEYWORD_DRAWS_EXHAUSTED.clone()),
        Box::new(SNAPSHOT_DURATION.clone()),
        Box::new(SNAPSHOT_FAILURES.clone()),
    ]
}

//! Prometheus metrics for catalog traffic.
//!
//! This module provides metrics for:
//! - Upstream catalog requests (counts by outcome, latency)
//! - Search cache effectiveness
//! - Degraded responses (fallback list, popular listing size)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Upstream Requests
// =============================================================================

/// Catalog requests total by operation and outcome.
pub static CATALOG_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "bookshelf_catalog_requests_total",
            "Total catalog service requests",
        ),
        &["operation", "status"], // operation: "search", "work", "editions"; status: "success", "error"
    )
    .unwrap()
});

/// Catalog request duration in seconds.
pub static CATALOG_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "bookshelf_catalog_request_duration_seconds",
            "Duration of catalog service calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 8.0]),
        &["operation"],
    )
    .unwrap()
});

// =============================================================================
// Cache
// =============================================================================

/// Cache lookups by result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("bookshelf_cache_lookups_total", "Total search cache lookups"),
        &["result"], // "hit", "miss", "expired"
    )
    .unwrap()
});

// =============================================================================
// Degradation
// =============================================================================

/// Searches answered from the built-in fallback list.
pub static FALLBACK_RESULTS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "bookshelf_fallback_results_total",
        "Searches served from the fallback list",
    )
    .unwrap()
});

/// Unique records found per popular listing.
pub static POPULAR_CANDIDATES: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "bookshelf_popular_candidates",
            "Unique records collected per popular listing",
        )
        .buckets(vec![0.0, 1.0, 6.0, 12.0, 24.0, 36.0, 60.0]),
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CATALOG_REQUESTS.clone()),
        Box::new(CATALOG_REQUEST_DURATION.clone()),
        Box::new(CACHE_LOOKUPS.clone()),
        Box::new(FALLBACK_RESULTS.clone()),
        Box::new(POPULAR_CANDIDATES.clone()),
    ]
}

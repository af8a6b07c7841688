//! Prometheus metrics for the generation pipeline.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

/// Pipeline runs by mode and result.
pub static PIPELINE_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shamrock_pipeline_runs_total", "Total generation pipeline runs"),
        &["mode", "result"], // result: "stored", "failed"
    )
    .unwrap()
});

/// Pipeline failures by stage.
pub static PIPELINE_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shamrock_pipeline_failures_total",
            "Total generation pipeline failures",
        ),
        &["stage"], // "submit", "poll", "download", "store"
    )
    .unwrap()
});

/// Duration of one pipeline run in seconds.
pub static PIPELINE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "shamrock_pipeline_duration_seconds",
            "Duration of one generation pipeline run",
        )
        .buckets(vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0]),
        &["result"],
    )
    .unwrap()
});

/// Status checks performed against the generation service.
pub static POLL_CHECKS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "shamrock_poll_checks_total",
        "Total job status checks performed",
    )
    .unwrap()
});

/// Bytes of image payload downloaded.
pub static DOWNLOADED_BYTES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "shamrock_downloaded_bytes_total",
        "Total image bytes downloaded",
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(PIPELINE_RUNS.clone()),
        Box::new(PIPELINE_FAILURES.clone()),
        Box::new(PIPELINE_DURATION.clone()),
        Box::new(POLL_CHECKS.clone()),
        Box::new(DOWNLOADED_BYTES.clone()),
    ]
}

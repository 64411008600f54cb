//! # Quorum Intersection Metrics
//!
//! Prometheus metrics for monitoring quorum intersection checks.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! qc-18-quorum-intersection = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `quorum_checks_completed_total` - Counter of finished checks (by verdict)
//! - `quorum_checks_undetermined_total` - Counter of checks stopped early (by reason)
//! - `quorum_check_latency_seconds` - Histogram of check durations
//! - `quorum_enumerator_calls_total` - Counter of enumerator calls across checks

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_counter_vec, register_histogram, register_int_counter, CounterVec, Histogram,
    IntCounter,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Finished checks, labeled `holds` or `split`
    pub static ref CHECKS_COMPLETED: CounterVec = register_counter_vec!(
        "quorum_checks_completed_total",
        "Total number of quorum intersection checks that reached a verdict",
        &["verdict"]
    )
    .expect("Failed to create CHECKS_COMPLETED metric");

    /// Checks stopped before a verdict, labeled by reason
    pub static ref CHECKS_UNDETERMINED: CounterVec = register_counter_vec!(
        "quorum_checks_undetermined_total",
        "Total number of quorum intersection checks stopped before a verdict",
        &["reason"]
    )
    .expect("Failed to create CHECKS_UNDETERMINED metric");

    /// Histogram of check latency
    pub static ref CHECK_LATENCY: Histogram = register_histogram!(
        "quorum_check_latency_seconds",
        "Time taken by a quorum intersection check in seconds",
        vec![0.001, 0.01, 0.1, 0.5, 1.0, 5.0, 30.0, 120.0, 600.0]
    )
    .expect("Failed to create CHECK_LATENCY metric");

    /// Enumerator calls across all checks
    pub static ref ENUMERATOR_CALLS: IntCounter = register_int_counter!(
        "quorum_enumerator_calls_total",
        "Total number of minimal-quorum enumerator calls"
    )
    .expect("Failed to create ENUMERATOR_CALLS metric");
}

/// Record a check that reached a verdict
#[cfg(feature = "metrics")]
pub fn record_check_completed(intersects: bool) {
    let verdict = if intersects { "holds" } else { "split" };
    CHECKS_COMPLETED.with_label_values(&[verdict]).inc();
}

/// Record a check stopped before a verdict
#[cfg(feature = "metrics")]
pub fn record_check_undetermined(reason: &str) {
    CHECKS_UNDETERMINED.with_label_values(&[reason]).inc();
}

/// Record check latency
#[cfg(feature = "metrics")]
pub fn record_check_latency(seconds: f64) {
    CHECK_LATENCY.observe(seconds);
}

/// Record enumerator calls made by one check
#[cfg(feature = "metrics")]
pub fn record_enumerator_calls(calls: u64) {
    ENUMERATOR_CALLS.inc_by(calls);
}

// No-op implementations when metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn record_check_completed(_intersects: bool) {}

#[cfg(not(feature = "metrics"))]
pub fn record_check_undetermined(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_check_latency(_seconds: f64) {}

#[cfg(not(feature = "metrics"))]
pub fn record_enumerator_calls(_calls: u64) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_callable_in_any_build() {
        record_check_completed(true);
        record_check_completed(false);
        record_check_undetermined("interrupted");
        record_check_latency(0.25);
        record_enumerator_calls(42);
    }
}

//! Metrics for classifier requests.
//!
//! Emitted through the `metrics` facade; they are dropped unless the host
//! installs a recorder.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const CLASSIFY_REQUESTS_TOTAL: &str = "dram_classify_requests_total";
    pub const CLASSIFY_DURATION_SECONDS: &str = "dram_classify_duration_seconds";
}

/// Record one classification request and its outcome
/// (`success`, or an error kind such as `network`).
pub fn record_classification(outcome: &'static str, duration_secs: f64) {
    counter!(names::CLASSIFY_REQUESTS_TOTAL, "outcome" => outcome).increment(1);
    histogram!(names::CLASSIFY_DURATION_SECONDS).record(duration_secs);
}

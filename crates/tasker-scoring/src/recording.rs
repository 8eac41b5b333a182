// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion and mirror metrics, recorded through the metrics facade.
//!
//! Descriptions are registered by the Prometheus adapter; without an
//! installed recorder these calls are no-ops.

/// Record the outcome of one `complete` call (`completed`, `not_found`, ...).
pub fn record_completion(outcome: &'static str) {
    metrics::counter!("tasker_completions_total", "outcome" => outcome).increment(1);
}

/// Record the score delta of a committed completion.
pub fn record_score_delta(delta: i64) {
    metrics::histogram!("tasker_score_delta").record(delta as f64);
}

/// Record a compare-and-swap conflict that forced a re-score.
pub fn record_commit_retry() {
    metrics::counter!("tasker_commit_retries_total").increment(1);
}

/// Record a failed graph mirror write.
pub fn record_mirror_failure() {
    metrics::counter!("tasker_mirror_failures_total").increment(1);
}

/// Record the final result of a queued mirror resync (`synced`, `gave_up`, `dropped`).
pub fn record_mirror_retry(result: &'static str) {
    metrics::counter!("tasker_mirror_retries_total", "result" => result).increment(1);
}

// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric descriptions and HTTP-level recording helpers.
//!
//! Completion and mirror metrics are recorded by the scoring crate through
//! the same facade; their descriptions live here so one call covers all.

use metrics::{describe_counter, describe_histogram};

/// Register descriptions for every Social Tasker metric.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "tasker_completions_total",
        "Task completion attempts by outcome"
    );
    describe_histogram!(
        "tasker_score_delta",
        "Score delta applied per committed completion"
    );
    describe_counter!(
        "tasker_commit_retries_total",
        "Completion commits retried after a concurrent user update"
    );
    describe_counter!(
        "tasker_mirror_failures_total",
        "Failed writes of a committed score to the social graph"
    );
    describe_counter!(
        "tasker_mirror_retries_total",
        "Queued score mirror resyncs by final result"
    );
    describe_counter!("tasker_http_requests_total", "HTTP requests by route and status");
}

/// Record one served HTTP request.
pub fn record_http_request(route: &str, status: u16) {
    metrics::counter!(
        "tasker_http_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

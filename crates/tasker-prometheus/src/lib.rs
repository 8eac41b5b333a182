// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus metrics adapter for Social Tasker.
//!
//! Uses the metrics-rs facade with the Prometheus exporter. Metrics are
//! rendered as Prometheus text through [`PrometheusAdapter::render`], which
//! the gateway serves at `/metrics`.

pub mod recording;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

use tasker_core::TaskerError;

pub use recording::{record_http_request, register_metrics};

/// Prometheus metrics adapter holding the render handle.
#[derive(Clone)]
pub struct PrometheusAdapter {
    handle: PrometheusHandle,
}

impl PrometheusAdapter {
    /// Install the Prometheus recorder globally.
    ///
    /// Only one recorder can be installed per process; a second call fails.
    pub fn new() -> Result<Self, TaskerError> {
        let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
            TaskerError::Internal(format!("failed to install Prometheus recorder: {e}"))
        })?;

        recording::register_metrics();

        tracing::info!("prometheus metrics recorder installed");

        Ok(Self { handle })
    }

    /// Build a recorder without installing it, for scoped use.
    pub fn unregistered() -> (Self, PrometheusRecorder) {
        let recorder = PrometheusBuilder::new().build_recorder();
        let adapter = Self {
            handle: recorder.handle(),
        };
        (adapter, recorder)
    }

    /// The Prometheus handle.
    pub fn handle(&self) -> &PrometheusHandle {
        &self.handle
    }

    /// Render all collected metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

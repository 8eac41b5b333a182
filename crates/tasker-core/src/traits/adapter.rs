// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait that all store backends implement.

use async_trait::async_trait;

use crate::error::TaskerError;
use crate::types::HealthStatus;

/// Identity, health, and lifecycle shared by every store backend.
#[async_trait]
pub trait StoreAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this backend.
    fn name(&self) -> &str;

    /// Performs a health check and returns the backend's current status.
    async fn health_check(&self) -> Result<HealthStatus, TaskerError>;

    /// Flushes pending writes and releases held resources.
    async fn close(&self) -> Result<(), TaskerError>;
}

// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The durability boundary of a task completion.

use async_trait::async_trait;

use crate::error::TaskerError;
use crate::traits::adapter::StoreAdapter;
use crate::types::{CommitOutcome, CompletionCommit};

/// Applies the user update and the task status transition as one unit.
#[async_trait]
pub trait CompletionStore: StoreAdapter {
    /// Atomically writes the user's new score/streaks and marks the task
    /// completed.
    ///
    /// The write only happens if the user is still at
    /// `commit.expected_revision` and the task is still `open`; otherwise a
    /// non-`Committed` outcome is returned and nothing is written. An `Err`
    /// means the unit was rolled back.
    async fn commit_completion(
        &self,
        commit: &CompletionCommit,
    ) -> Result<CommitOutcome, TaskerError>;
}

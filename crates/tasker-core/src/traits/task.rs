// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task record store.

use async_trait::async_trait;

use crate::error::TaskerError;
use crate::traits::adapter::StoreAdapter;
use crate::types::{NewTask, TaskPatch, TaskRecord};

/// Per-user task records keyed by user and task id.
#[async_trait]
pub trait TaskStore: StoreAdapter {
    /// Creates an `open` task and returns it with its generated id.
    async fn create_task(&self, task: &NewTask) -> Result<TaskRecord, TaskerError>;

    /// Loads a task scoped to its owner, or `None` if absent.
    async fn get_task(&self, user_id: &str, task_id: &str)
    -> Result<Option<TaskRecord>, TaskerError>;

    /// Lists a user's tasks ordered by due date ascending.
    async fn list_tasks(&self, user_id: &str) -> Result<Vec<TaskRecord>, TaskerError>;

    /// Edits a task's descriptive fields. Fails with
    /// [`TaskerError::TaskNotFound`] if absent.
    async fn update_task(
        &self,
        user_id: &str,
        task_id: &str,
        patch: &TaskPatch,
    ) -> Result<TaskRecord, TaskerError>;

    /// Deletes a task. Returns false if absent.
    async fn delete_task(&self, user_id: &str, task_id: &str) -> Result<bool, TaskerError>;
}

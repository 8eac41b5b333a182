// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Social Tasker backend.

use thiserror::Error;

/// The primary error type used across all store traits and core operations.
#[derive(Debug, Error)]
pub enum TaskerError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors on reads or connection management.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A write at the durability boundary failed; nothing was committed.
    #[error("store write failed: {message}")]
    StoreWrite {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The user record does not exist.
    #[error("user not found: {user_id}")]
    UserNotFound { user_id: String },

    /// The task record does not exist in the user's task collection.
    #[error("task not found: {task_id} (user {user_id})")]
    TaskNotFound { user_id: String, task_id: String },

    /// No pending friend request from `requester_id` to `user_id`.
    #[error("no pending friend request from {requester_id} to {user_id}")]
    RequestNotFound {
        user_id: String,
        requester_id: String,
    },

    /// The task has already transitioned to `completed`.
    #[error("task already completed: {task_id}")]
    AlreadyCompleted { task_id: String },

    /// The task is missing a field the scoring engine needs.
    #[error("invalid task: {0}")]
    InvalidTask(String),

    /// The task priority is present but not text.
    #[error("invalid priority: {0}")]
    InvalidPriority(String),

    /// Request input failed validation.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The request conflicts with existing state (duplicate user, existing friendship).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Best-effort score mirror into the social graph failed.
    #[error("score mirror failed: {message}")]
    Mirror {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Missing or wrong API key.
    #[error("unauthorized")]
    Unauthorized,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TaskerError {
    /// Returns true for the not-found family (user or task absent).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TaskerError::UserNotFound { .. }
                | TaskerError::TaskNotFound { .. }
                | TaskerError::RequestNotFound { .. }
        )
    }
}

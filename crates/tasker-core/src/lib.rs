// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Social Tasker backend.
//!
//! This crate provides the record types, error type, and store traits shared
//! by every other crate in the workspace. Storage backends implement the
//! traits defined here; the scoring engine and gateway consume them.

pub mod error;
pub mod time;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TaskerError;
pub use types::{
    CommitOutcome, CompletionCommit, FriendRequest, GraphUser, HealthStatus, NewTask, NewUser,
    Priority, RawPriority, TaskPatch, TaskRecord, TaskStatus, UserPatch, UserRecord,
};

pub use traits::{
    CompletionStore, FriendRequestStore, GraphStore, RecordStore, StoreAdapter, TaskStore,
    UserStore,
};

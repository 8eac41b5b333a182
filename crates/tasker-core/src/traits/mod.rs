// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store trait definitions.
//!
//! Every store extends the [`StoreAdapter`] base trait and uses
//! `#[async_trait]` for dynamic dispatch compatibility. Stores are injected
//! into the orchestrator and gateway as `Arc<dyn ...>` values.

pub mod adapter;
pub mod completion;
pub mod graph;
pub mod requests;
pub mod task;
pub mod user;

pub use adapter::StoreAdapter;
pub use completion::CompletionStore;
pub use graph::GraphStore;
pub use requests::FriendRequestStore;
pub use task::TaskStore;
pub use user::UserStore;

/// The primary record store: users, tasks, and the atomic completion commit.
///
/// Blanket-implemented for anything providing all three capabilities.
pub trait RecordStore: UserStore + TaskStore + CompletionStore {}

impl<T: UserStore + TaskStore + CompletionStore> RecordStore for T {}

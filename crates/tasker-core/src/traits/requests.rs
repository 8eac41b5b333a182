// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pending friend request store, decoupled from the friend-edge store.

use async_trait::async_trait;

use crate::error::TaskerError;
use crate::traits::adapter::StoreAdapter;
use crate::types::FriendRequest;

/// Per-user ordered collection of pending requester ids.
#[async_trait]
pub trait FriendRequestStore: StoreAdapter {
    /// Appends `requester_id` to `target_id`'s pending list.
    ///
    /// Returns false if the request was already pending.
    async fn push_request(&self, target_id: &str, requester_id: &str)
    -> Result<bool, TaskerError>;

    /// Pending requests for `target_id` in arrival order.
    async fn list_requests(&self, target_id: &str) -> Result<Vec<FriendRequest>, TaskerError>;

    /// Removes one pending request. Returns true only for the call that removed it.
    async fn remove_request(&self, target_id: &str, requester_id: &str)
    -> Result<bool, TaskerError>;

    /// Removes the pending request and creates the friendship in both
    /// directions as one unit.
    ///
    /// Returns false, changing nothing, when no such request is pending. Fails
    /// with [`TaskerError::UserNotFound`], also changing nothing, when either
    /// user has no graph node.
    async fn accept_request(&self, target_id: &str, requester_id: &str)
    -> Result<bool, TaskerError>;

    /// Drops every request sent to or by `user_id`.
    async fn clear_user(&self, user_id: &str) -> Result<(), TaskerError>;
}

// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Social graph store: friend edges and the leaderboard score mirror.

use async_trait::async_trait;

use crate::error::TaskerError;
use crate::traits::adapter::StoreAdapter;
use crate::types::GraphUser;

/// Holds the symmetric friend-of relationship and a denormalized copy of
/// each user's score for peer ranking.
#[async_trait]
pub trait GraphStore: StoreAdapter {
    /// Creates or renames a user node (score starts at 0 for new nodes).
    async fn upsert_node(&self, user_id: &str, name: &str) -> Result<(), TaskerError>;

    /// Removes a node and all of its edges.
    async fn remove_node(&self, user_id: &str) -> Result<(), TaskerError>;

    /// Mirrors a user's cumulative score, read at user `revision`, onto their node.
    ///
    /// Writes carrying an older revision than the node already holds are
    /// skipped and return `false`, so concurrent mirrors converge on the
    /// newest score regardless of arrival order.
    async fn set_score(&self, user_id: &str, score: i64, revision: i64)
    -> Result<bool, TaskerError>;

    /// Loads a node, or `None` if absent.
    async fn get_node(&self, user_id: &str) -> Result<Option<GraphUser>, TaskerError>;

    /// Creates the edge in both directions. Idempotent.
    async fn add_friendship(&self, user_id: &str, friend_id: &str) -> Result<(), TaskerError>;

    /// True if an edge exists between the two users.
    async fn are_friends(&self, user_id: &str, friend_id: &str) -> Result<bool, TaskerError>;

    /// The user's friends, highest mirrored score first.
    async fn friends(&self, user_id: &str) -> Result<Vec<GraphUser>, TaskerError>;

    /// Nodes whose name contains `query`, case-insensitively.
    async fn search_by_name(&self, query: &str) -> Result<Vec<GraphUser>, TaskerError>;
}

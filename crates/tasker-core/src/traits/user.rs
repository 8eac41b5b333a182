// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User record store.

use async_trait::async_trait;

use crate::error::TaskerError;
use crate::traits::adapter::StoreAdapter;
use crate::types::{NewUser, UserPatch, UserRecord};

/// Per-user profile records including cumulative score and streak counters.
///
/// Score and streak fields are only written through
/// [`CompletionStore::commit_completion`](crate::traits::CompletionStore).
#[async_trait]
pub trait UserStore: StoreAdapter {
    /// Creates a user with a null score and zeroed streaks.
    ///
    /// Fails with [`TaskerError::Conflict`] if the id is taken.
    async fn create_user(&self, user: &NewUser) -> Result<UserRecord, TaskerError>;

    /// Loads a user, or `None` if absent.
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, TaskerError>;

    /// Updates profile fields. Fails with [`TaskerError::UserNotFound`] if absent.
    async fn update_user(&self, user_id: &str, patch: &UserPatch)
    -> Result<UserRecord, TaskerError>;

    /// Deletes a user and every task they own. Returns false if absent.
    async fn delete_user(&self, user_id: &str) -> Result<bool, TaskerError>;
}

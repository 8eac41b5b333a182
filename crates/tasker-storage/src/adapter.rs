// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of every store trait.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::OnceCell;
use tracing::debug;

use tasker_config::model::StorageConfig;
use tasker_core::{
    CommitOutcome, CompletionCommit, CompletionStore, FriendRequest, FriendRequestStore,
    GraphStore, GraphUser, HealthStatus, NewTask, NewUser, StoreAdapter, TaskPatch, TaskRecord,
    TaskStore, TaskerError, UserPatch, UserRecord, UserStore,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed store.
///
/// One handle serves the record store, the social graph, and the friend
/// request lists. The database is opened by [`SqliteStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a store; the database is not opened until [`initialize`](Self::initialize).
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Create and initialize in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, TaskerError> {
        let store = Self::new(config);
        store.initialize().await?;
        Ok(store)
    }

    /// Open the database and run migrations. Fails if called twice.
    pub async fn initialize(&self) -> Result<(), TaskerError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| TaskerError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    fn db(&self) -> Result<&Database, TaskerError> {
        self.db.get().ok_or_else(|| TaskerError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl StoreAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn health_check(&self) -> Result<HealthStatus, TaskerError> {
        let Some(db) = self.db.get() else {
            return Ok(HealthStatus::Unhealthy("not initialized".into()));
        };
        let ping = db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err);
        Ok(match ping {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }

    async fn close(&self) -> Result<(), TaskerError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn create_user(&self, user: &NewUser) -> Result<UserRecord, TaskerError> {
        queries::users::create_user(self.db()?, user, Utc::now()).await
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, TaskerError> {
        queries::users::get_user(self.db()?, user_id).await
    }

    async fn update_user(
        &self,
        user_id: &str,
        patch: &UserPatch,
    ) -> Result<UserRecord, TaskerError> {
        queries::users::update_user(self.db()?, user_id, patch)
            .await?
            .ok_or_else(|| TaskerError::UserNotFound {
                user_id: user_id.to_string(),
            })
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool, TaskerError> {
        queries::users::delete_user(self.db()?, user_id).await
    }
}

#[async_trait]
impl TaskStore for SqliteStore {
    async fn create_task(&self, task: &NewTask) -> Result<TaskRecord, TaskerError> {
        queries::tasks::create_task(self.db()?, task).await
    }

    async fn get_task(
        &self,
        user_id: &str,
        task_id: &str,
    ) -> Result<Option<TaskRecord>, TaskerError> {
        queries::tasks::get_task(self.db()?, user_id, task_id).await
    }

    async fn list_tasks(&self, user_id: &str) -> Result<Vec<TaskRecord>, TaskerError> {
        queries::tasks::list_tasks(self.db()?, user_id).await
    }

    async fn update_task(
        &self,
        user_id: &str,
        task_id: &str,
        patch: &TaskPatch,
    ) -> Result<TaskRecord, TaskerError> {
        queries::tasks::update_task(self.db()?, user_id, task_id, patch)
            .await?
            .ok_or_else(|| TaskerError::TaskNotFound {
                user_id: user_id.to_string(),
                task_id: task_id.to_string(),
            })
    }

    async fn delete_task(&self, user_id: &str, task_id: &str) -> Result<bool, TaskerError> {
        queries::tasks::delete_task(self.db()?, user_id, task_id).await
    }
}

#[async_trait]
impl CompletionStore for SqliteStore {
    async fn commit_completion(
        &self,
        commit: &CompletionCommit,
    ) -> Result<CommitOutcome, TaskerError> {
        queries::completion::commit_completion(self.db()?, commit).await
    }
}

#[async_trait]
impl GraphStore for SqliteStore {
    async fn upsert_node(&self, user_id: &str, name: &str) -> Result<(), TaskerError> {
        queries::graph::upsert_node(self.db()?, user_id, name).await
    }

    async fn remove_node(&self, user_id: &str) -> Result<(), TaskerError> {
        queries::graph::remove_node(self.db()?, user_id).await
    }

    async fn set_score(
        &self,
        user_id: &str,
        score: i64,
        revision: i64,
    ) -> Result<bool, TaskerError> {
        queries::graph::set_score(self.db()?, user_id, score, revision).await
    }

    async fn get_node(&self, user_id: &str) -> Result<Option<GraphUser>, TaskerError> {
        queries::graph::get_node(self.db()?, user_id).await
    }

    async fn add_friendship(&self, user_id: &str, friend_id: &str) -> Result<(), TaskerError> {
        queries::graph::add_friendship(self.db()?, user_id, friend_id).await
    }

    async fn are_friends(&self, user_id: &str, friend_id: &str) -> Result<bool, TaskerError> {
        queries::graph::are_friends(self.db()?, user_id, friend_id).await
    }

    async fn friends(&self, user_id: &str) -> Result<Vec<GraphUser>, TaskerError> {
        queries::graph::friends(self.db()?, user_id).await
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<GraphUser>, TaskerError> {
        queries::graph::search_by_name(self.db()?, query).await
    }
}

#[async_trait]
impl FriendRequestStore for SqliteStore {
    async fn push_request(
        &self,
        target_id: &str,
        requester_id: &str,
    ) -> Result<bool, TaskerError> {
        queries::requests::push_request(self.db()?, target_id, requester_id, Utc::now()).await
    }

    async fn list_requests(&self, target_id: &str) -> Result<Vec<FriendRequest>, TaskerError> {
        queries::requests::list_requests(self.db()?, target_id).await
    }

    async fn remove_request(
        &self,
        target_id: &str,
        requester_id: &str,
    ) -> Result<bool, TaskerError> {
        queries::requests::remove_request(self.db()?, target_id, requester_id).await
    }

    async fn accept_request(
        &self,
        target_id: &str,
        requester_id: &str,
    ) -> Result<bool, TaskerError> {
        queries::requests::accept_request(self.db()?, target_id, requester_id).await
    }

    async fn clear_user(&self, user_id: &str) -> Result<(), TaskerError> {
        queries::requests::clear_user(self.db()?, user_id).await
    }
}

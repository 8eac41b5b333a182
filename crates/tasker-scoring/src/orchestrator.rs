// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The completion pipeline: load, score, commit, mirror.
//!
//! Loading and scoring have no side effects. The commit is the durability
//! boundary: user and task are written in one transaction guarded by the
//! user's revision, and a revision conflict re-reads and re-scores. The
//! graph mirror runs after the commit and never undoes it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, IntoStaticStr};
use tracing::{debug, info, warn};

use tasker_config::model::ScoringConfig;
use tasker_core::{
    CommitOutcome, CompletionCommit, CompletionStore, GraphStore, RecordStore, TaskStatus,
    TaskStore, TaskerError, UserStore,
};

use crate::engine::{self, ScoreBreakdown, ScoringTask, StreakState};
use crate::mirror::MirrorHandle;
use crate::recording;

/// Where a single completion stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum CompletionPhase {
    Open,
    Completing,
    Completed,
    Failed,
}

/// Whether the graph mirror reflects the committed score yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MirrorStatus {
    Synced,
    Deferred,
}

/// What the caller gets back from a committed completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionReceipt {
    pub user_id: String,
    pub task_id: String,
    /// Cumulative score after this completion.
    pub score: i64,
    pub score_delta: i64,
    pub task_day_streak: u32,
    pub task_week_streak: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub completed_at: DateTime<Utc>,
    pub mirror: MirrorStatus,
    pub breakdown: ScoreBreakdown,
}

/// Runs completions against injected stores.
pub struct CompletionOrchestrator {
    records: Arc<dyn RecordStore>,
    graph: Arc<dyn GraphStore>,
    mirror_queue: Option<MirrorHandle>,
    max_commit_attempts: u32,
}

impl CompletionOrchestrator {
    pub fn new(
        records: Arc<dyn RecordStore>,
        graph: Arc<dyn GraphStore>,
        config: &ScoringConfig,
    ) -> Self {
        Self {
            records,
            graph,
            mirror_queue: None,
            max_commit_attempts: config.max_commit_attempts.max(1),
        }
    }

    /// Hand failed mirrors to a retry worker instead of only logging them.
    pub fn with_mirror_queue(mut self, handle: MirrorHandle) -> Self {
        self.mirror_queue = Some(handle);
        self
    }

    /// Complete `task_id` for `user_id` at `now`.
    ///
    /// Fails with `AlreadyCompleted` if the task is not open, so a client
    /// retry after a timeout never scores twice.
    pub async fn complete(
        &self,
        user_id: &str,
        task_id: &str,
        now: DateTime<Utc>,
    ) -> Result<CompletionReceipt, TaskerError> {
        let mut phase = CompletionPhase::Open;
        let result = self.run(user_id, task_id, now, &mut phase).await;
        match &result {
            Ok(receipt) => {
                recording::record_completion("completed");
                recording::record_score_delta(receipt.score_delta);
                info!(
                    user_id,
                    task_id,
                    score = receipt.score,
                    score_delta = receipt.score_delta,
                    day_streak = receipt.task_day_streak,
                    week_streak = receipt.task_week_streak,
                    mirror = %receipt.mirror,
                    "task completed"
                );
            }
            Err(e) => {
                let from = phase;
                phase = CompletionPhase::Failed;
                recording::record_completion(outcome_label(e));
                debug!(user_id, task_id, %from, %phase, error = %e, "completion failed");
            }
        }
        result
    }

    async fn run(
        &self,
        user_id: &str,
        task_id: &str,
        now: DateTime<Utc>,
        phase: &mut CompletionPhase,
    ) -> Result<CompletionReceipt, TaskerError> {
        for attempt in 1..=self.max_commit_attempts {
            let user = self
                .records
                .get_user(user_id)
                .await?
                .ok_or_else(|| TaskerError::UserNotFound {
                    user_id: user_id.to_string(),
                })?;
            let task = self
                .records
                .get_task(user_id, task_id)
                .await?
                .ok_or_else(|| TaskerError::TaskNotFound {
                    user_id: user_id.to_string(),
                    task_id: task_id.to_string(),
                })?;
            if task.status == TaskStatus::Completed {
                return Err(already_completed(task_id));
            }

            *phase = CompletionPhase::Completing;
            let outcome =
                engine::score_completion(&StreakState::from(&user), &ScoringTask::from(&task), now)?;
            let score = user.effective_score() + outcome.score_delta;
            let commit = CompletionCommit {
                user_id: user_id.to_string(),
                task_id: task_id.to_string(),
                expected_revision: user.revision,
                score,
                day_streak: outcome.day_streak,
                week_streak: outcome.week_streak,
                completed_at: now,
            };

            let committed = self
                .records
                .commit_completion(&commit)
                .await
                .map_err(|e| TaskerError::StoreWrite {
                    message: format!("completion commit for task {task_id} failed"),
                    source: Some(Box::new(e)),
                })?;

            match committed {
                CommitOutcome::Committed { revision } => {
                    *phase = CompletionPhase::Completed;
                    debug!(user_id, task_id, revision, attempt, "completion committed");
                    let mirror = self.mirror(user_id, score, revision).await;
                    return Ok(CompletionReceipt {
                        user_id: user_id.to_string(),
                        task_id: task_id.to_string(),
                        score,
                        score_delta: outcome.score_delta,
                        task_day_streak: outcome.day_streak,
                        task_week_streak: outcome.week_streak,
                        completed_at: now,
                        mirror,
                        breakdown: outcome.breakdown,
                    });
                }
                CommitOutcome::UserChanged => {
                    recording::record_commit_retry();
                    debug!(user_id, task_id, attempt, "user changed during completion, re-scoring");
                    *phase = CompletionPhase::Open;
                }
                CommitOutcome::UserMissing => {
                    return Err(TaskerError::UserNotFound {
                        user_id: user_id.to_string(),
                    });
                }
                CommitOutcome::TaskMissing => {
                    return Err(TaskerError::TaskNotFound {
                        user_id: user_id.to_string(),
                        task_id: task_id.to_string(),
                    });
                }
                CommitOutcome::AlreadyCompleted => return Err(already_completed(task_id)),
            }
        }

        Err(TaskerError::StoreWrite {
            message: format!(
                "user {user_id} kept changing; gave up after {} commit attempts",
                self.max_commit_attempts
            ),
            source: None,
        })
    }

    /// Best-effort write of the committed score to the graph.
    ///
    /// The graph keeps the score of the highest revision it has seen, so a
    /// slower mirror of an older commit cannot overwrite a newer total.
    async fn mirror(&self, user_id: &str, score: i64, revision: i64) -> MirrorStatus {
        match self.graph.set_score(user_id, score, revision).await {
            Ok(true) => MirrorStatus::Synced,
            Ok(false) => {
                debug!(user_id, score, revision, "newer score already mirrored");
                MirrorStatus::Synced
            }
            Err(e) => {
                recording::record_mirror_failure();
                let queued = self
                    .mirror_queue
                    .as_ref()
                    .is_some_and(|queue| queue.enqueue(user_id));
                warn!(user_id, score, queued, error = %e, "score mirror failed, completion kept");
                MirrorStatus::Deferred
            }
        }
    }
}

fn already_completed(task_id: &str) -> TaskerError {
    TaskerError::AlreadyCompleted {
        task_id: task_id.to_string(),
    }
}

fn outcome_label(e: &TaskerError) -> &'static str {
    match e {
        e if e.is_not_found() => "not_found",
        TaskerError::AlreadyCompleted { .. } => "already_completed",
        TaskerError::InvalidTask(_) | TaskerError::InvalidPriority(_) => "invalid",
        _ => "store_error",
    }
}

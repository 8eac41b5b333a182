// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The atomic completion commit.
//!
//! The user update and the task status transition share one SQLite
//! transaction. The user row is guarded by its revision and the task row by
//! `status = 'open'`, so a lost race writes nothing.

use rusqlite::{OptionalExtension, params};
use tasker_core::{CommitOutcome, CompletionCommit, TaskStatus, TaskerError};

use super::users::select_user;
use crate::database::{Database, map_tr_err};

/// Apply a completion commit, or report why it could not be applied.
pub async fn commit_completion(
    db: &Database,
    commit: &CompletionCommit,
) -> Result<CommitOutcome, TaskerError> {
    let commit = commit.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let status: Option<String> = tx
                .query_row(
                    "SELECT status FROM tasks WHERE user_id = ?1 AND id = ?2",
                    params![commit.user_id, commit.task_id],
                    |row| row.get(0),
                )
                .optional()?;
            match status.as_deref().map(str::parse::<TaskStatus>) {
                None => return Ok(CommitOutcome::TaskMissing),
                Some(Ok(TaskStatus::Completed)) => return Ok(CommitOutcome::AlreadyCompleted),
                Some(_) => {}
            }

            let user_rows = tx.execute(
                "UPDATE users SET
                    score = ?1,
                    last_task_completed_date = ?2,
                    task_day_streak = ?3,
                    task_week_streak = ?4,
                    revision = revision + 1
                 WHERE user_id = ?5 AND revision = ?6",
                params![
                    commit.score,
                    commit.completed_at.timestamp_millis(),
                    commit.day_streak,
                    commit.week_streak,
                    commit.user_id,
                    commit.expected_revision,
                ],
            )?;
            if user_rows == 0 {
                let exists = select_user(&tx, &commit.user_id)?.is_some();
                return Ok(if exists {
                    CommitOutcome::UserChanged
                } else {
                    CommitOutcome::UserMissing
                });
            }

            let task_rows = tx.execute(
                "UPDATE tasks SET status = ?1, completed_at = ?2
                 WHERE user_id = ?3 AND id = ?4 AND status != ?1",
                params![
                    TaskStatus::Completed.to_string(),
                    commit.completed_at.timestamp_millis(),
                    commit.user_id,
                    commit.task_id,
                ],
            )?;
            if task_rows == 0 {
                return Ok(CommitOutcome::AlreadyCompleted);
            }

            tx.commit()?;
            Ok(CommitOutcome::Committed {
                revision: commit.expected_revision + 1,
            })
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{tasks, users};
    use chrono::{DateTime, Duration, Utc};
    use tasker_core::{NewTask, NewUser, Priority};
    use tempfile::tempdir;

    async fn setup() -> (Database, tempfile::TempDir, String) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("commit.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let user = NewUser {
            user_id: "u1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
        };
        users::create_user(&db, &user, Utc::now()).await.unwrap();
        let task = NewTask {
            user_id: "u1".into(),
            title: "t".into(),
            description: String::new(),
            details: String::new(),
            priority: Priority::Medium,
            due_date: Utc::now() + Duration::days(1),
            created_at: Utc::now(),
        };
        let id = tasks::create_task(&db, &task).await.unwrap().id;
        (db, dir, id)
    }

    fn commit_for(task_id: &str, revision: i64) -> CompletionCommit {
        CompletionCommit {
            user_id: "u1".into(),
            task_id: task_id.into(),
            expected_revision: revision,
            score: 81,
            day_streak: 1,
            week_streak: 0,
            completed_at: DateTime::from_timestamp_millis(1_767_225_600_000).unwrap(),
        }
    }

    #[tokio::test]
    async fn commit_writes_user_and_task_together() {
        let (db, _dir, task_id) = setup().await;
        let outcome = commit_completion(&db, &commit_for(&task_id, 0)).await.unwrap();
        assert_eq!(outcome, CommitOutcome::Committed { revision: 1 });

        let user = users::get_user(&db, "u1").await.unwrap().unwrap();
        assert_eq!(user.score, Some(81));
        assert_eq!(user.task_day_streak, 1);
        assert_eq!(user.revision, 1);
        assert_eq!(
            user.last_task_completed_date,
            DateTime::from_timestamp_millis(1_767_225_600_000)
        );

        let task = tasks::get_task(&db, "u1", &task_id).await.unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.completed_at.is_some());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn second_commit_on_same_task_is_rejected_without_writes() {
        let (db, _dir, task_id) = setup().await;
        commit_completion(&db, &commit_for(&task_id, 0)).await.unwrap();
        let mut again = commit_for(&task_id, 1);
        again.score = 500;
        let outcome = commit_completion(&db, &again).await.unwrap();
        assert_eq!(outcome, CommitOutcome::AlreadyCompleted);

        let user = users::get_user(&db, "u1").await.unwrap().unwrap();
        assert_eq!(user.score, Some(81));
        assert_eq!(user.revision, 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn stale_revision_reports_user_changed() {
        let (db, _dir, task_id) = setup().await;
        let outcome = commit_completion(&db, &commit_for(&task_id, 42)).await.unwrap();
        assert_eq!(outcome, CommitOutcome::UserChanged);

        let task = tasks::get_task(&db, "u1", &task_id).await.unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Open);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn missing_rows_are_reported() {
        let (db, _dir, task_id) = setup().await;
        let outcome = commit_completion(&db, &commit_for("nope", 0)).await.unwrap();
        assert_eq!(outcome, CommitOutcome::TaskMissing);

        let mut ghost = commit_for(&task_id, 0);
        ghost.user_id = "ghost".into();
        let outcome = commit_completion(&db, &ghost).await.unwrap();
        assert_eq!(outcome, CommitOutcome::TaskMissing);
        db.close().await.unwrap();
    }
}

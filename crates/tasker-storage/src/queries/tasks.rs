// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task record CRUD, always scoped to the owning user.

use rusqlite::{OptionalExtension, Row, params};
use tasker_core::{NewTask, TaskPatch, TaskRecord, TaskStatus, TaskerError};

use super::{priority_at, status_at, timestamp_at};
use crate::database::{Database, map_tr_err};

const TASK_COLUMNS: &str =
    "id, user_id, title, description, details, priority, due_date, created_at, status, completed_at";

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<TaskRecord> {
    Ok(TaskRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        details: row.get(4)?,
        priority: priority_at(row, 5)?,
        due_date: timestamp_at(row, 6)?,
        created_at: timestamp_at(row, 7)?,
        status: status_at(row, 8)?,
        completed_at: timestamp_at(row, 9)?,
    })
}

fn select_task(
    conn: &rusqlite::Connection,
    user_id: &str,
    task_id: &str,
) -> rusqlite::Result<Option<TaskRecord>> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?1 AND id = ?2"),
        params![user_id, task_id],
        task_from_row,
    )
    .optional()
}

/// Insert an `open` task with a fresh UUID.
pub async fn create_task(db: &Database, task: &NewTask) -> Result<TaskRecord, TaskerError> {
    let task = task.clone();
    let id = uuid::Uuid::new_v4().to_string();
    let record = TaskRecord {
        id: id.clone(),
        user_id: task.user_id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        details: task.details.clone(),
        priority: Some(task.priority.into()),
        due_date: Some(task.due_date),
        created_at: Some(task.created_at),
        status: TaskStatus::Open,
        completed_at: None,
    };
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO tasks (id, user_id, title, description, details, priority,
                                    due_date, created_at, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    id,
                    task.user_id,
                    task.title,
                    task.description,
                    task.details,
                    task.priority.to_string(),
                    task.due_date.timestamp_millis(),
                    task.created_at.timestamp_millis(),
                    TaskStatus::Open.to_string(),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(record)
}

/// Get one task scoped to its owner.
pub async fn get_task(
    db: &Database,
    user_id: &str,
    task_id: &str,
) -> Result<Option<TaskRecord>, TaskerError> {
    let user_id = user_id.to_string();
    let task_id = task_id.to_string();
    db.connection()
        .call(move |conn| select_task(conn, &user_id, &task_id))
        .await
        .map_err(map_tr_err)
}

/// List a user's tasks by due date ascending; undated rows sort last.
pub async fn list_tasks(db: &Database, user_id: &str) -> Result<Vec<TaskRecord>, TaskerError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?1
                 ORDER BY due_date IS NULL, due_date ASC, created_at ASC, id ASC"
            ))?;
            let rows = stmt.query_map(params![user_id], task_from_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })
        .await
        .map_err(map_tr_err)
}

/// Apply an edit; `None` fields are left untouched. Status is never changed here.
pub async fn update_task(
    db: &Database,
    user_id: &str,
    task_id: &str,
    patch: &TaskPatch,
) -> Result<Option<TaskRecord>, TaskerError> {
    let user_id = user_id.to_string();
    let task_id = task_id.to_string();
    let patch = patch.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE tasks SET
                    title = COALESCE(?1, title),
                    description = COALESCE(?2, description),
                    details = COALESCE(?3, details),
                    priority = COALESCE(?4, priority),
                    due_date = COALESCE(?5, due_date)
                 WHERE user_id = ?6 AND id = ?7",
                params![
                    patch.title,
                    patch.description,
                    patch.details,
                    patch.priority.map(|p| p.to_string()),
                    patch.due_date.map(|d| d.timestamp_millis()),
                    user_id,
                    task_id,
                ],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            select_task(conn, &user_id, &task_id)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a task. Returns false if it did not exist.
pub async fn delete_task(db: &Database, user_id: &str, task_id: &str) -> Result<bool, TaskerError> {
    let user_id = user_id.to_string();
    let task_id = task_id.to_string();
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM tasks WHERE user_id = ?1 AND id = ?2",
                params![user_id, task_id],
            )?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::users;
    use chrono::{DateTime, Duration, Utc};
    use tasker_core::{NewUser, Priority, RawPriority};
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("tasks.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let user = NewUser {
            user_id: "u1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
        };
        users::create_user(&db, &user, Utc::now()).await.unwrap();
        (db, dir)
    }

    fn new_task(title: &str, due: DateTime<Utc>) -> NewTask {
        NewTask {
            user_id: "u1".into(),
            title: title.into(),
            description: "desc".into(),
            details: "details".into(),
            priority: Priority::High,
            due_date: due,
            created_at: DateTime::from_timestamp_millis(1_767_225_600_000).unwrap(),
        }
    }

    #[tokio::test]
    async fn create_and_get_task_roundtrips() {
        let (db, _dir) = setup_db().await;
        let due = DateTime::from_timestamp_millis(1_767_484_800_000).unwrap();
        let created = create_task(&db, &new_task("Write report", due)).await.unwrap();
        assert_eq!(created.status, TaskStatus::Open);

        let loaded = get_task(&db, "u1", &created.id).await.unwrap().unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.priority, Some(RawPriority::Text("high".into())));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_task_is_scoped_to_owner() {
        let (db, _dir) = setup_db().await;
        let created = create_task(&db, &new_task("Mine", Utc::now())).await.unwrap();
        assert!(get_task(&db, "someone-else", &created.id).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_tasks_orders_by_due_date() {
        let (db, _dir) = setup_db().await;
        let base = Utc::now();
        create_task(&db, &new_task("later", base + Duration::days(3))).await.unwrap();
        create_task(&db, &new_task("soonest", base + Duration::days(1))).await.unwrap();
        create_task(&db, &new_task("middle", base + Duration::days(2))).await.unwrap();

        let titles: Vec<String> = list_tasks(&db, "u1")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["soonest", "middle", "later"]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_task_keeps_status() {
        let (db, _dir) = setup_db().await;
        let created = create_task(&db, &new_task("Draft", Utc::now())).await.unwrap();
        let patch = TaskPatch {
            title: Some("Final".into()),
            priority: Some(Priority::Low),
            ..TaskPatch::default()
        };
        let updated = update_task(&db, "u1", &created.id, &patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.description, "desc");
        assert_eq!(updated.priority, Some(RawPriority::Text("low".into())));
        assert_eq!(updated.status, TaskStatus::Open);
        assert!(
            update_task(&db, "u1", "missing", &patch)
                .await
                .unwrap()
                .is_none()
        );
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn malformed_rows_decode_leniently() {
        let (db, _dir) = setup_db().await;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO tasks (id, user_id, title, priority, due_date, created_at, status)
                     VALUES ('legacy', 'u1', 'Legacy', 3, 'not a date', '2026-01-01', 'incomplete')",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();
        let task = get_task(&db, "u1", "legacy").await.unwrap().unwrap();
        assert_eq!(task.priority, Some(RawPriority::NonText("3".into())));
        assert!(task.due_date.is_none());
        assert!(task.created_at.is_some());
        assert_eq!(task.status, TaskStatus::Open);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn deleting_user_cascades_to_tasks() {
        let (db, _dir) = setup_db().await;
        let created = create_task(&db, &new_task("Doomed", Utc::now())).await.unwrap();
        users::delete_user(&db, "u1").await.unwrap();
        assert!(get_task(&db, "u1", &created.id).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_task_reports_presence() {
        let (db, _dir) = setup_db().await;
        let created = create_task(&db, &new_task("Gone", Utc::now())).await.unwrap();
        assert!(delete_task(&db, "u1", &created.id).await.unwrap());
        assert!(!delete_task(&db, "u1", &created.id).await.unwrap());
        db.close().await.unwrap();
    }
}

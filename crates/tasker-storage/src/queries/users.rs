// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User record CRUD.

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row, params};
use tasker_core::{NewUser, TaskerError, UserPatch, UserRecord};

use super::{required_timestamp_at, timestamp_at};
use crate::database::{Database, map_tr_err};

const USER_COLUMNS: &str = "user_id, name, email, score, last_task_completed_date, \
     task_day_streak, task_week_streak, revision, created_at";

pub(crate) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        user_id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        score: row.get(3)?,
        last_task_completed_date: timestamp_at(row, 4)?,
        task_day_streak: row.get(5)?,
        task_week_streak: row.get(6)?,
        revision: row.get(7)?,
        created_at: required_timestamp_at(row, 8)?,
    })
}

pub(crate) fn select_user(
    conn: &rusqlite::Connection,
    user_id: &str,
) -> rusqlite::Result<Option<UserRecord>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
        params![user_id],
        user_from_row,
    )
    .optional()
}

/// Insert a user with a null score and zeroed streaks.
///
/// Returns `Conflict` if the id is already taken.
pub async fn create_user(
    db: &Database,
    user: &NewUser,
    created_at: DateTime<Utc>,
) -> Result<UserRecord, TaskerError> {
    let user = user.clone();
    let user_id = user.user_id.clone();
    let created = db
        .connection()
        .call(move |conn| {
            let inserted = conn.execute(
                "INSERT INTO users (user_id, name, email, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(user_id) DO NOTHING",
                params![
                    user.user_id,
                    user.name,
                    user.email,
                    created_at.timestamp_millis()
                ],
            )?;
            if inserted == 0 {
                return Ok(None);
            }
            select_user(conn, &user.user_id)
        })
        .await
        .map_err(map_tr_err)?;

    created.ok_or_else(|| TaskerError::Conflict(format!("user {user_id} already exists")))
}

/// Get a user by id.
pub async fn get_user(db: &Database, user_id: &str) -> Result<Option<UserRecord>, TaskerError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| select_user(conn, &user_id))
        .await
        .map_err(map_tr_err)
}

/// Update profile fields; `None` fields are left untouched.
pub async fn update_user(
    db: &Database,
    user_id: &str,
    patch: &UserPatch,
) -> Result<Option<UserRecord>, TaskerError> {
    let user_id = user_id.to_string();
    let patch = patch.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE users SET name = COALESCE(?1, name), email = COALESCE(?2, email)
                 WHERE user_id = ?3",
                params![patch.name, patch.email, user_id],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            select_user(conn, &user_id)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a user; their tasks go with them via `ON DELETE CASCADE`.
pub async fn delete_user(db: &Database, user_id: &str) -> Result<bool, TaskerError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute("DELETE FROM users WHERE user_id = ?1", params![user_id])?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_tr_err)
}

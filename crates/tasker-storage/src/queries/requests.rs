// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pending friend requests, one ordered list per target user.

use chrono::{DateTime, Utc};
use rusqlite::params;
use tasker_core::{FriendRequest, TaskerError};

use super::graph::insert_edges;
use super::required_timestamp_at;
use crate::database::{Database, flatten_call_err, map_tr_err, sql_err};

/// Append a request. Returns false when it was already pending.
pub async fn push_request(
    db: &Database,
    target_id: &str,
    requester_id: &str,
    requested_at: DateTime<Utc>,
) -> Result<bool, TaskerError> {
    let target_id = target_id.to_string();
    let requester_id = requester_id.to_string();
    db.connection()
        .call(move |conn| {
            let inserted = conn.execute(
                "INSERT INTO friend_requests (target_id, requester_id, requested_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(target_id, requester_id) DO NOTHING",
                params![target_id, requester_id, requested_at.timestamp_millis()],
            )?;
            Ok(inserted == 1)
        })
        .await
        .map_err(map_tr_err)
}

/// Pending requests for `target_id`, oldest first.
pub async fn list_requests(
    db: &Database,
    target_id: &str,
) -> Result<Vec<FriendRequest>, TaskerError> {
    let target_id = target_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT requester_id, requested_at FROM friend_requests
                 WHERE target_id = ?1 ORDER BY seq ASC",
            )?;
            let rows = stmt.query_map(params![target_id], |row| {
                Ok(FriendRequest {
                    requester_id: row.get(0)?,
                    requested_at: required_timestamp_at(row, 1)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Remove one request. Only the caller whose delete hit the row sees `true`.
pub async fn remove_request(
    db: &Database,
    target_id: &str,
    requester_id: &str,
) -> Result<bool, TaskerError> {
    let target_id = target_id.to_string();
    let requester_id = requester_id.to_string();
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM friend_requests WHERE target_id = ?1 AND requester_id = ?2",
                params![target_id, requester_id],
            )?;
            Ok(deleted == 1)
        })
        .await
        .map_err(map_tr_err)
}

/// Consume a pending request and link both users in one transaction.
///
/// Returns false when no request was pending. Rolls back and reports
/// `UserNotFound` when either user has no graph node.
pub async fn accept_request(
    db: &Database,
    target_id: &str,
    requester_id: &str,
) -> Result<bool, TaskerError> {
    let target_id = target_id.to_string();
    let requester_id = requester_id.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, TaskerError> {
            let tx = conn.transaction().map_err(sql_err)?;
            let deleted = tx
                .execute(
                    "DELETE FROM friend_requests WHERE target_id = ?1 AND requester_id = ?2",
                    params![target_id, requester_id],
                )
                .map_err(sql_err)?;
            if deleted == 0 {
                return Ok(false);
            }
            for user_id in [&target_id, &requester_id] {
                let exists: bool = tx
                    .query_row(
                        "SELECT EXISTS(SELECT 1 FROM graph_users WHERE user_id = ?1)",
                        params![user_id],
                        |row| row.get(0),
                    )
                    .map_err(sql_err)?;
                if !exists {
                    // Dropping the transaction rolls the delete back.
                    return Err(TaskerError::UserNotFound {
                        user_id: user_id.clone(),
                    });
                }
            }
            insert_edges(&tx, &target_id, &requester_id).map_err(sql_err)?;
            tx.commit().map_err(sql_err)?;
            Ok(true)
        })
        .await
        .map_err(flatten_call_err)
}

/// Drop every request sent to or by `user_id`.
pub async fn clear_user(db: &Database, user_id: &str) -> Result<(), TaskerError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "DELETE FROM friend_requests WHERE target_id = ?1 OR requester_id = ?1",
                params![user_id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

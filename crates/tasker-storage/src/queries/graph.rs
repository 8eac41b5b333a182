// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Social graph queries: nodes, symmetric friend edges, and the score mirror.

use rusqlite::{OptionalExtension, Row, params};
use tasker_core::{GraphUser, TaskerError};

use crate::database::{Database, map_tr_err};

fn node_from_row(row: &Row<'_>) -> rusqlite::Result<GraphUser> {
    Ok(GraphUser {
        user_id: row.get(0)?,
        name: row.get(1)?,
        score: row.get(2)?,
    })
}

/// Escape `%`, `_` and `\` so user input matches literally inside LIKE.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Create a node with score 0, or rename an existing one.
pub async fn upsert_node(db: &Database, user_id: &str, name: &str) -> Result<(), TaskerError> {
    let user_id = user_id.to_string();
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO graph_users (user_id, name) VALUES (?1, ?2)
                 ON CONFLICT(user_id) DO UPDATE SET name = excluded.name",
                params![user_id, name],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Remove a node; its edges cascade.
pub async fn remove_node(db: &Database, user_id: &str) -> Result<(), TaskerError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM graph_users WHERE user_id = ?1", params![user_id])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Mirror `score`, taken from user revision `revision`, onto the node.
///
/// A write older than the one already mirrored is skipped and reports
/// `false`. Fails with `UserNotFound` when no node exists.
pub async fn set_score(
    db: &Database,
    user_id: &str,
    score: i64,
    revision: i64,
) -> Result<bool, TaskerError> {
    let owned = user_id.to_string();
    let outcome = db
        .connection()
        .call(move |conn| -> rusqlite::Result<Option<bool>> {
            let changed = conn.execute(
                "UPDATE graph_users SET score = ?1, score_revision = ?3
                 WHERE user_id = ?2 AND score_revision <= ?3",
                params![score, owned, revision],
            )?;
            if changed == 1 {
                return Ok(Some(true));
            }
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM graph_users WHERE user_id = ?1)",
                params![owned],
                |row| row.get(0),
            )?;
            Ok(exists.then_some(false))
        })
        .await
        .map_err(map_tr_err)?;
    outcome.ok_or_else(|| TaskerError::UserNotFound {
        user_id: user_id.to_string(),
    })
}

pub async fn get_node(db: &Database, user_id: &str) -> Result<Option<GraphUser>, TaskerError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT user_id, name, score FROM graph_users WHERE user_id = ?1",
                params![user_id],
                node_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Insert both directions of the edge. Runs inside the caller's transaction.
pub(crate) fn insert_edges(
    conn: &rusqlite::Connection,
    user_id: &str,
    friend_id: &str,
) -> rusqlite::Result<()> {
    let mut stmt =
        conn.prepare_cached("INSERT OR IGNORE INTO friendships (user_id, friend_id) VALUES (?1, ?2)")?;
    stmt.execute(params![user_id, friend_id])?;
    stmt.execute(params![friend_id, user_id])?;
    Ok(())
}

/// Insert both directions of the edge in one transaction. Existing edges are kept.
pub async fn add_friendship(
    db: &Database,
    user_id: &str,
    friend_id: &str,
) -> Result<(), TaskerError> {
    let user_id = user_id.to_string();
    let friend_id = friend_id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            insert_edges(&tx, &user_id, &friend_id)?;
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn are_friends(db: &Database, user_id: &str, friend_id: &str) -> Result<bool, TaskerError> {
    let user_id = user_id.to_string();
    let friend_id = friend_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM friendships WHERE user_id = ?1 AND friend_id = ?2)",
                params![user_id, friend_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Friends of `user_id`, highest score first, ties broken by name.
pub async fn friends(db: &Database, user_id: &str) -> Result<Vec<GraphUser>, TaskerError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT g.user_id, g.name, g.score
                 FROM friendships f JOIN graph_users g ON g.user_id = f.friend_id
                 WHERE f.user_id = ?1
                 ORDER BY g.score DESC, g.name ASC, g.user_id ASC",
            )?;
            let rows = stmt.query_map(params![user_id], node_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Case-insensitive substring match on node names.
pub async fn search_by_name(db: &Database, query: &str) -> Result<Vec<GraphUser>, TaskerError> {
    let pattern = format!("%{}%", escape_like(query));
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, name, score FROM graph_users
                 WHERE name LIKE ?1 ESCAPE '\\'
                 ORDER BY name ASC, user_id ASC",
            )?;
            let rows = stmt.query_map(params![pattern], node_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

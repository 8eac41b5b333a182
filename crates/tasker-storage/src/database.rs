// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management: PRAGMA setup, migrations, and lifecycle.
//!
//! All reads and writes are serialized through tokio-rusqlite's single
//! background thread. Do NOT open additional connections for writes; the
//! completion commit relies on this for its compare-and-swap semantics.

use std::time::Duration;

use tasker_core::TaskerError;
use tracing::debug;

use crate::migrations;

/// Handle to the single SQLite connection.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` in WAL mode and run migrations.
    pub async fn open(path: &str) -> Result<Self, TaskerError> {
        Self::open_with(path, true).await
    }

    /// Open the database, choosing the journal mode explicitly.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, TaskerError> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| TaskerError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| TaskerError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |conn| -> Result<(), TaskerError> {
            conn.busy_timeout(Duration::from_secs(5)).map_err(sql_err)?;
            conn.pragma_update(None, "foreign_keys", "ON")
                .map_err(sql_err)?;
            if wal_mode {
                let mode: String = conn
                    .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
                    .map_err(sql_err)?;
                debug!(journal_mode = %mode, "journal mode set");
                conn.pragma_update(None, "synchronous", "NORMAL")
                    .map_err(sql_err)?;
            }
            migrations::run_migrations(conn)
        })
        .await
        .map_err(flatten_call_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(&self) -> Result<(), TaskerError> {
        self.checkpoint().await?;
        self.conn.clone().close().await.map_err(map_tr_err)
    }

    /// Truncating WAL checkpoint.
    pub async fn checkpoint(&self) -> Result<(), TaskerError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

/// Convert a tokio-rusqlite error into `TaskerError::Storage`.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> TaskerError {
    TaskerError::Storage {
        source: Box::new(e),
    }
}

/// Unwrap a closure-level `TaskerError`, or wrap a connection-level failure.
pub fn flatten_call_err(e: tokio_rusqlite::Error<TaskerError>) -> TaskerError {
    match e {
        tokio_rusqlite::Error::Error(inner) => inner,
        other => TaskerError::Storage {
            source: other.to_string().into(),
        },
    }
}

/// Wrap a raw rusqlite error inside a connection closure.
pub fn sql_err(e: rusqlite::Error) -> TaskerError {
    TaskerError::Storage {
        source: Box::new(e),
    }
}

// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules plus the lenient column decoders they share.
//!
//! Task rows may have been written by older clients, so timestamps and
//! priorities are decoded by storage class instead of trusting the schema.

pub mod completion;
pub mod graph;
pub mod requests;
pub mod tasks;
pub mod users;

use chrono::{DateTime, Utc};
use rusqlite::Row;
use rusqlite::types::{Type, ValueRef};
use tasker_core::time;
use tasker_core::{RawPriority, TaskStatus};

/// Decode a timestamp column: integer/real millis, or text in any accepted format.
pub(crate) fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Integer(ms) => time::from_millis(ms),
        ValueRef::Real(ms) => time::from_millis(ms as i64),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(time::parse_timestamp),
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}

/// Decode a priority column, preserving non-text values so scoring can reject them.
pub(crate) fn priority_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<RawPriority>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Text(bytes) => Some(RawPriority::Text(
            String::from_utf8_lossy(bytes).into_owned(),
        )),
        ValueRef::Integer(i) => Some(RawPriority::NonText(i.to_string())),
        ValueRef::Real(f) => Some(RawPriority::NonText(f.to_string())),
        ValueRef::Blob(b) => Some(RawPriority::NonText(format!("<blob {} bytes>", b.len()))),
    })
}

/// Decode a task status column.
pub(crate) fn status_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<TaskStatus> {
    let raw: String = row.get(idx)?;
    raw.parse::<TaskStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Decode a required timestamp column, falling back to the epoch for garbage.
pub(crate) fn required_timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    Ok(timestamp_at(row, idx)?.unwrap_or(DateTime::UNIX_EPOCH))
}

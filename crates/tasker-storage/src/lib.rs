// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for Social Tasker.
//!
//! One WAL-mode database holds the record store (users, tasks), the social
//! graph (nodes, friendships, mirrored scores), and the pending friend
//! request lists. Migrations are embedded and run on open; all writes go
//! through `tokio-rusqlite`'s single background thread.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStore;
pub use database::Database;

// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record types shared across store traits, the scoring engine, and the gateway.
//!
//! Timestamps serialize as Unix milliseconds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString};

/// Health status reported by store health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Store is fully operational.
    Healthy,
    /// Store is operational but experiencing issues.
    Degraded(String),
    /// Store is not operational.
    Unhealthy(String),
}

// --- Users ---

/// A user's profile, cumulative score, and streak counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub name: String,
    pub email: String,
    /// Cumulative score. `None` until the first completion; read as 0.
    pub score: Option<i64>,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub last_task_completed_date: Option<DateTime<Utc>>,
    pub task_day_streak: u32,
    pub task_week_streak: u32,
    /// Optimistic-concurrency counter, bumped on every completion commit.
    #[serde(skip_serializing, default)]
    pub revision: i64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// The cumulative score with the "null means zero" rule applied.
    pub fn effective_score(&self) -> i64 {
        self.score.unwrap_or(0)
    }
}

/// Fields required to create a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

/// Mutable profile fields. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

// --- Tasks ---

/// Recognized task priorities.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Lenient parse: unrecognized strings yield `None` instead of an error.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        raw.trim().to_ascii_lowercase().parse().ok()
    }
}

/// A priority value exactly as it was stored.
///
/// Documents written outside the API may carry a priority of any type, so the
/// stored value is kept raw and interpreted at scoring time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPriority {
    /// A textual priority (recognized or not).
    Text(String),
    /// A non-text value, kept in its debug rendering.
    NonText(String),
}

impl RawPriority {
    /// The recognized priority, if this is text naming one.
    pub fn recognized(&self) -> Option<Priority> {
        match self {
            RawPriority::Text(s) => Priority::parse_lenient(s),
            RawPriority::NonText(_) => None,
        }
    }
}

impl From<Priority> for RawPriority {
    fn from(p: Priority) -> Self {
        RawPriority::Text(p.to_string())
    }
}

impl Serialize for RawPriority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RawPriority::Text(s) | RawPriority::NonText(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for RawPriority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(s) => RawPriority::Text(s),
            other => RawPriority::NonText(other.to_string()),
        })
    }
}

/// Task lifecycle status. The only transition is `Open -> Completed`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
pub enum TaskStatus {
    #[serde(rename = "open", alias = "incomplete")]
    #[strum(to_string = "open", serialize = "incomplete")]
    Open,
    #[serde(rename = "completed", alias = "complete")]
    #[strum(to_string = "completed", serialize = "complete")]
    Completed,
}

/// A task in a user's task collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub details: String,
    #[serde(default)]
    pub priority: Option<RawPriority>,
    /// Required by the API; `None` only for records that were stored malformed.
    #[serde(with = "chrono::serde::ts_milliseconds_option", default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(with = "chrono::serde::ts_milliseconds_option", default)]
    pub created_at: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    #[serde(with = "chrono::serde::ts_milliseconds_option", default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Fields required to create a task. New tasks always start `Open`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub details: String,
    pub priority: Priority,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Editable task fields. Status is deliberately absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub details: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.details.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

// --- Completion ---

/// Everything written at the durability boundary of one completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionCommit {
    pub user_id: String,
    pub task_id: String,
    /// The user revision the score was computed from.
    pub expected_revision: i64,
    /// New cumulative score (prior + delta).
    pub score: i64,
    pub day_streak: u32,
    pub week_streak: u32,
    pub completed_at: DateTime<Utc>,
}

/// Result of attempting a completion commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Both writes landed; carries the user's new revision.
    Committed { revision: i64 },
    /// The user record changed since it was read; nothing was written.
    UserChanged,
    /// The user record disappeared; nothing was written.
    UserMissing,
    /// The task disappeared; nothing was written.
    TaskMissing,
    /// The task was already completed; nothing was written.
    AlreadyCompleted,
}

// --- Social graph ---

/// A user node in the social graph, carrying the mirrored score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphUser {
    pub user_id: String,
    pub name: String,
    pub score: i64,
}

/// A pending friend request held for its target user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRequest {
    pub requester_id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub requested_at: DateTime<Utc>,
}

// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request bodies and their validation.
//!
//! Validation collects every problem before failing so clients can fix a
//! request in one round trip. Field rules are declared with `validator`;
//! priority and date parsing, which need the raw JSON value, run alongside.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use tasker_core::time::{from_millis, parse_timestamp};
use tasker_core::{NewTask, NewUser, Priority, TaskPatch, TaskerError, UserPatch};

/// Body of `POST /api/create-user`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(custom(function = not_blank, message = "user_id cannot be empty"))]
    pub user_id: String,
    #[serde(default)]
    #[validate(custom(function = not_blank, message = "name cannot be empty"))]
    pub name: String,
    #[serde(default)]
    #[validate(
        custom(function = not_blank, message = "email cannot be empty"),
        email(message = "invalid email")
    )]
    pub email: String,
}

/// Body of `PUT /api/user/{user_id}`. Absent fields are left alone.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(custom(function = not_blank, message = "name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
}

/// Body of `POST /api/new-task`.
///
/// Dates are accepted as Unix milliseconds or as text.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct NewTaskRequest {
    #[serde(default)]
    #[validate(custom(function = not_blank, message = "user_id cannot be empty"))]
    pub user_id: String,
    #[serde(default)]
    #[validate(custom(function = not_blank, message = "title cannot be empty"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub priority: Option<Value>,
    #[serde(default)]
    pub due_date: Option<Value>,
    /// Accepted for compatibility; new tasks always start open.
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `PUT /api/task/{taskId}/user/{userId}`. Absent fields are left alone.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(custom(function = not_blank, message = "title cannot be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub details: Option<String>,
    pub priority: Option<Value>,
    pub due_date: Option<Value>,
    /// Ignored: status only changes through completion.
    pub status: Option<String>,
}

/// Body of `POST /api/add-friend`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = not_self_request))]
pub struct FriendRequestBody {
    #[serde(default)]
    #[validate(custom(function = not_blank, message = "userId cannot be empty"))]
    pub user_id: String,
    #[serde(default)]
    #[validate(custom(function = not_blank, message = "friendId cannot be empty"))]
    pub friend_id: String,
}

/// Body of `POST /api/accept-friend` and `POST /api/reject-friend`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FriendResponseBody {
    #[serde(default)]
    #[validate(custom(function = not_blank, message = "userId cannot be empty"))]
    pub user_id: String,
    #[serde(default)]
    #[validate(custom(function = not_blank, message = "requesterId cannot be empty"))]
    pub requester_id: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn not_self_request(body: &FriendRequestBody) -> Result<(), ValidationError> {
    if body.user_id == body.friend_id {
        return Err(ValidationError::new("self_request")
            .with_message(Cow::Borrowed("cannot send a friend request to yourself")));
    }
    Ok(())
}

/// Flatten derive errors into messages, sorted so responses are stable.
fn messages(result: Result<(), ValidationErrors>) -> Vec<String> {
    let Err(errors) = result else {
        return Vec::new();
    };
    let mut out: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    out.sort();
    out
}

fn finish<T>(errors: Vec<String>, value: T) -> Result<T, TaskerError> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(TaskerError::Validation(errors))
    }
}

fn parse_priority(errors: &mut Vec<String>, value: &Value) -> Option<Priority> {
    let parsed = value.as_str().and_then(Priority::parse_lenient);
    if parsed.is_none() {
        errors.push("priority must be one of low, medium, high".to_string());
    }
    parsed
}

fn parse_date(errors: &mut Vec<String>, field: &str, value: &Value) -> Option<DateTime<Utc>> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().and_then(from_millis),
        Value::String(s) => parse_timestamp(s),
        _ => None,
    };
    if parsed.is_none() {
        errors.push(format!("{field} must be a date"));
    }
    parsed
}

impl CreateUserRequest {
    pub fn into_new_user(mut self) -> Result<NewUser, TaskerError> {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_string();
        let errors = messages(Validate::validate(&self));
        finish(
            errors,
            NewUser {
                user_id: self.user_id,
                name: self.name,
                email: self.email,
            },
        )
    }
}

impl UpdateUserRequest {
    pub fn into_patch(self) -> Result<UserPatch, TaskerError> {
        let patch = UserPatch {
            name: self.name.map(|name| name.trim().to_string()),
            email: self.email.map(|email| email.trim().to_string()),
        };
        let trimmed = Self {
            name: patch.name.clone(),
            email: patch.email.clone(),
        };
        let mut errors = messages(Validate::validate(&trimmed));
        if errors.is_empty() && patch.is_empty() {
            errors.push("nothing to update".to_string());
        }
        finish(errors, patch)
    }
}

impl NewTaskRequest {
    /// Validate into a task created at `now`.
    pub fn into_new_task(self, now: DateTime<Utc>) -> Result<NewTask, TaskerError> {
        let mut errors = messages(Validate::validate(&self));

        let priority = match &self.priority {
            Some(value) => parse_priority(&mut errors, value),
            None => {
                errors.push("priority cannot be empty".to_string());
                None
            }
        };
        let due_date = match &self.due_date {
            Some(value) => parse_date(&mut errors, "due_date", value),
            None => {
                errors.push("due_date cannot be empty".to_string());
                None
            }
        };

        match (priority, due_date) {
            (Some(priority), Some(due_date)) if errors.is_empty() => Ok(NewTask {
                user_id: self.user_id,
                title: self.title,
                description: self.description,
                details: self.details,
                priority,
                due_date,
                created_at: now,
            }),
            _ => Err(TaskerError::Validation(errors)),
        }
    }
}

impl UpdateTaskRequest {
    pub fn into_patch(self) -> Result<TaskPatch, TaskerError> {
        let mut errors = messages(Validate::validate(&self));
        let priority = self
            .priority
            .as_ref()
            .and_then(|value| parse_priority(&mut errors, value));
        let due_date = self
            .due_date
            .as_ref()
            .and_then(|value| parse_date(&mut errors, "due_date", value));
        finish(
            errors,
            TaskPatch {
                title: self.title,
                description: self.description,
                details: self.details,
                priority,
                due_date,
            },
        )
    }
}

impl FriendRequestBody {
    pub fn checked(self) -> Result<Self, TaskerError> {
        finish(messages(Validate::validate(&self)), self)
    }
}

impl FriendResponseBody {
    pub fn checked(self) -> Result<Self, TaskerError> {
        finish(messages(Validate::validate(&self)), self)
    }
}

// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of domain errors onto HTTP responses.
//!
//! Every error body is `{ "error": message }`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use tasker_core::TaskerError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// A [`TaskerError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub TaskerError);

impl From<TaskerError> for ApiError {
    fn from(e: TaskerError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            TaskerError::AlreadyCompleted { .. } | TaskerError::Conflict(_) => {
                StatusCode::CONFLICT
            }
            TaskerError::InvalidTask(_) | TaskerError::InvalidPriority(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            TaskerError::Validation(_) => StatusCode::BAD_REQUEST,
            TaskerError::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            // Driver messages stay in the log.
            TaskerError::Storage { .. } => "storage error".to_string(),
            other => other.to_string(),
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Unwrap a JSON body, turning a rejection into a 400 with the standard body.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError(TaskerError::Validation(vec![rejection.body_text()])))
}

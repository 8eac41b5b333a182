// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task CRUD handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;

use tasker_core::{TaskRecord, TaskStore, TaskerError};

use crate::error::{ApiError, json_body};
use crate::handlers::users::load_user;
use crate::server::GatewayState;
use crate::validation::{NewTaskRequest, UpdateTaskRequest};

/// Response body for POST /api/new-task.
#[derive(Debug, Serialize)]
pub struct CreatedTask {
    #[serde(rename = "docId")]
    pub doc_id: String,
    /// The task title.
    pub task: String,
}

fn task_not_found(user_id: String, task_id: String) -> ApiError {
    TaskerError::TaskNotFound { user_id, task_id }.into()
}

/// POST /api/new-task
pub async fn create_task(
    State(state): State<GatewayState>,
    payload: Result<Json<NewTaskRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let task = json_body(payload)?.into_new_task(Utc::now())?;
    load_user(&state, &task.user_id).await?;
    let created = state.records.create_task(&task).await?;

    tracing::info!(user_id = %created.user_id, task_id = %created.id, "task created");
    let body = CreatedTask {
        doc_id: created.id,
        task: created.title,
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// GET /api/tasks/user/{user_id}
///
/// Ordered by due date, earliest first.
pub async fn list_tasks(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<TaskRecord>>, ApiError> {
    Ok(Json(state.records.list_tasks(&user_id).await?))
}

/// GET /api/task/{task_id}/user/{user_id}
pub async fn get_task(
    State(state): State<GatewayState>,
    Path((task_id, user_id)): Path<(String, String)>,
) -> Result<Json<TaskRecord>, ApiError> {
    match state.records.get_task(&user_id, &task_id).await? {
        Some(task) => Ok(Json(task)),
        None => Err(task_not_found(user_id, task_id)),
    }
}

/// PUT /api/task/{task_id}/user/{user_id}
///
/// Edits descriptive fields only; a `status` in the body is ignored.
pub async fn update_task(
    State(state): State<GatewayState>,
    Path((task_id, user_id)): Path<(String, String)>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<TaskRecord>, ApiError> {
    let patch = json_body(payload)?.into_patch()?;
    let updated = state.records.update_task(&user_id, &task_id, &patch).await?;
    tracing::debug!(%user_id, %task_id, "task updated");
    Ok(Json(updated))
}

/// DELETE /api/user/{user_id}/task/{task_id}
pub async fn delete_task(
    State(state): State<GatewayState>,
    Path((user_id, task_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    if !state.records.delete_task(&user_id, &task_id).await? {
        return Err(task_not_found(user_id, task_id));
    }
    tracing::info!(%user_id, %task_id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User lifecycle and dashboard handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use tasker_core::{TaskRecord, TaskStatus, TaskStore, TaskerError, UserRecord, UserStore};

use crate::error::{ApiError, json_body};
use crate::handlers::friends::{LeaderboardEntry, leaderboard_for};
use crate::server::GatewayState;
use crate::validation::{CreateUserRequest, UpdateUserRequest};

/// Open tasks shown on the dashboard.
const DASHBOARD_UPCOMING: usize = 5;

/// Response body for POST /api/create-user.
#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

/// Response body for GET /api/dashboard/{user_id}.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub user: UserRecord,
    pub upcoming_tasks: Vec<TaskRecord>,
    pub open_task_count: usize,
    pub leaderboard: Vec<LeaderboardEntry>,
}

pub(crate) async fn load_user(state: &GatewayState, user_id: &str) -> Result<UserRecord, ApiError> {
    state
        .records
        .get_user(user_id)
        .await?
        .ok_or_else(|| {
            TaskerError::UserNotFound {
                user_id: user_id.to_string(),
            }
            .into()
        })
}

/// POST /api/create-user
///
/// Creates the user record and its graph node. If the node cannot be
/// created the record is removed again.
pub async fn create_user(
    State(state): State<GatewayState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let user = json_body(payload)?.into_new_user()?;
    state.records.create_user(&user).await?;

    if let Err(e) = state.graph.upsert_node(&user.user_id, &user.name).await {
        if let Err(undo) = state.records.delete_user(&user.user_id).await {
            tracing::error!(user_id = %user.user_id, error = %undo, "failed to undo user creation");
        }
        return Err(e.into());
    }

    tracing::info!(user_id = %user.user_id, "user created");
    let body = CreatedUser {
        user_id: user.user_id,
        name: user.name,
        email: user.email,
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// GET /api/user/{user_id}
pub async fn get_user(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserRecord>, ApiError> {
    Ok(Json(load_user(&state, &user_id).await?))
}

/// PUT /api/user/{user_id}
///
/// Edits the profile. A new name is carried over to the graph node so friend
/// search and leaderboards show it.
pub async fn update_user(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserRecord>, ApiError> {
    let patch = json_body(payload)?.into_patch()?;
    let updated = state.records.update_user(&user_id, &patch).await?;
    if patch.name.is_some() {
        state.graph.upsert_node(&user_id, &updated.name).await?;
    }
    tracing::info!(%user_id, "user profile updated");
    Ok(Json(updated))
}

/// DELETE /api/user/{user_id}
///
/// Removes the graph node with its edges and every pending request to or
/// from the user, then the record itself (tasks cascade). The record goes
/// last so a failed cleanup can be retried against a user that still exists.
pub async fn delete_user(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    load_user(&state, &user_id).await?;
    state.graph.remove_node(&user_id).await?;
    state.requests.clear_user(&user_id).await?;
    if !state.records.delete_user(&user_id).await? {
        return Err(TaskerError::UserNotFound { user_id }.into());
    }
    tracing::info!(%user_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/dashboard/{user_id}
pub async fn dashboard(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
) -> Result<Json<Dashboard>, ApiError> {
    let user = load_user(&state, &user_id).await?;
    let open: Vec<TaskRecord> = state
        .records
        .list_tasks(&user_id)
        .await?
        .into_iter()
        .filter(|t| t.status == TaskStatus::Open)
        .collect();
    let open_task_count = open.len();
    let upcoming_tasks = open.into_iter().take(DASHBOARD_UPCOMING).collect();
    let leaderboard = leaderboard_for(&state, &user).await?;

    Ok(Json(Dashboard {
        user,
        upcoming_tasks,
        open_task_count,
        leaderboard,
    }))
}

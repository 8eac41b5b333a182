// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PUT /api/user/{user_id}/complete-task/{task_id}

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::Serialize;

use tasker_scoring::MirrorStatus;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Response body for a completed task.
#[derive(Debug, Serialize)]
pub struct CompleteTaskResponse {
    pub message: String,
    pub score: i64,
    pub score_delta: i64,
    pub task_day_streak: u32,
    pub task_week_streak: u32,
    pub mirror: MirrorStatus,
}

/// Run the completion pipeline for one task.
///
/// Repeating the call for a completed task returns 409 and changes nothing.
pub async fn complete_task(
    State(state): State<GatewayState>,
    Path((user_id, task_id)): Path<(String, String)>,
) -> Result<Json<CompleteTaskResponse>, ApiError> {
    let receipt = state
        .orchestrator
        .complete(&user_id, &task_id, Utc::now())
        .await?;
    Ok(Json(CompleteTaskResponse {
        message: format!("Task {} completed", receipt.task_id),
        score: receipt.score,
        score_delta: receipt.score_delta,
        task_day_streak: receipt.task_day_streak,
        task_week_streak: receipt.task_week_streak,
        mirror: receipt.mirror,
    }))
}

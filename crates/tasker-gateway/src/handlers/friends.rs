// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Friend search, requests, and the score leaderboard.
//!
//! A request is removed exactly once: by acceptance, which also creates the
//! edge in both directions, or by rejection, which does not.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use tasker_core::{FriendRequest, GraphUser, TaskerError, UserRecord};

use crate::error::{ApiError, json_body};
use crate::handlers::users::load_user;
use crate::server::GatewayState;
use crate::validation::{FriendRequestBody, FriendResponseBody};

/// One row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: String,
    pub name: String,
    pub score: i64,
    pub is_self: bool,
}

/// Response body for friend request operations.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendPair {
    pub user_id: String,
    pub friend_id: String,
}

async fn require_node(state: &GatewayState, user_id: &str) -> Result<GraphUser, ApiError> {
    state.graph.get_node(user_id).await?.ok_or_else(|| {
        TaskerError::UserNotFound {
            user_id: user_id.to_string(),
        }
        .into()
    })
}

/// Rank a user among their friends by mirrored score.
pub(crate) async fn leaderboard_for(
    state: &GatewayState,
    user: &UserRecord,
) -> Result<Vec<LeaderboardEntry>, ApiError> {
    let me = state.graph.get_node(&user.user_id).await?.unwrap_or(GraphUser {
        user_id: user.user_id.clone(),
        name: user.name.clone(),
        score: user.effective_score(),
    });
    let mut rows = state.graph.friends(&user.user_id).await?;
    rows.push(me);
    rows.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(i, node)| LeaderboardEntry {
            rank: i + 1,
            is_self: node.user_id == user.user_id,
            user_id: node.user_id,
            name: node.name,
            score: node.score,
        })
        .collect())
}

/// GET /api/search-friend/{name}
pub async fn search(
    State(state): State<GatewayState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<GraphUser>>, ApiError> {
    Ok(Json(state.graph.search_by_name(name.trim()).await?))
}

/// POST /api/add-friend
///
/// Queues `userId` on `friendId`'s pending list.
pub async fn add_friend(
    State(state): State<GatewayState>,
    payload: Result<Json<FriendRequestBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let body = json_body(payload)?.checked()?;
    require_node(&state, &body.user_id).await?;
    require_node(&state, &body.friend_id).await?;

    if state.graph.are_friends(&body.user_id, &body.friend_id).await? {
        return Err(TaskerError::Conflict(format!(
            "{} and {} are already friends",
            body.user_id, body.friend_id
        ))
        .into());
    }
    if !state
        .requests
        .push_request(&body.friend_id, &body.user_id)
        .await?
    {
        return Err(TaskerError::Conflict("friend request already pending".into()).into());
    }

    tracing::info!(requester = %body.user_id, target = %body.friend_id, "friend request sent");
    let pair = FriendPair {
        user_id: body.user_id,
        friend_id: body.friend_id,
    };
    Ok((StatusCode::CREATED, Json(pair)).into_response())
}

/// GET /api/friend-requests/{user_id}
pub async fn list_requests(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<FriendRequest>>, ApiError> {
    Ok(Json(state.requests.list_requests(&user_id).await?))
}

fn no_request(body: &FriendResponseBody) -> ApiError {
    TaskerError::RequestNotFound {
        user_id: body.user_id.clone(),
        requester_id: body.requester_id.clone(),
    }
    .into()
}

/// POST /api/accept-friend
pub async fn accept(
    State(state): State<GatewayState>,
    payload: Result<Json<FriendResponseBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let body = json_body(payload)?.checked()?;
    // Either user may have been deleted while the request was pending; the
    // request then stays put and the error surfaces as a 404.
    if !state
        .requests
        .accept_request(&body.user_id, &body.requester_id)
        .await?
    {
        return Err(no_request(&body));
    }

    tracing::info!(user = %body.user_id, friend = %body.requester_id, "friend request accepted");
    let pair = FriendPair {
        user_id: body.user_id,
        friend_id: body.requester_id,
    };
    Ok((StatusCode::CREATED, Json(pair)).into_response())
}

/// POST /api/reject-friend
pub async fn reject(
    State(state): State<GatewayState>,
    payload: Result<Json<FriendResponseBody>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let body = json_body(payload)?.checked()?;
    if !state
        .requests
        .remove_request(&body.user_id, &body.requester_id)
        .await?
    {
        return Err(no_request(&body));
    }
    tracing::info!(user = %body.user_id, requester = %body.requester_id, "friend request rejected");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/friends/{user_id}
pub async fn friends(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<GraphUser>>, ApiError> {
    require_node(&state, &user_id).await?;
    Ok(Json(state.graph.friends(&user_id).await?))
}

/// GET /api/leaderboard/{user_id}
pub async fn leaderboard(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let user = load_user(&state, &user_id).await?;
    Ok(Json(leaderboard_for(&state, &user).await?))
}

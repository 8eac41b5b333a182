// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tasker_core::{FriendRequestStore, GraphStore, RecordStore, TaskerError};
use tasker_scoring::CompletionOrchestrator;

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;

/// State for the unauthenticated health and metrics endpoints.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Optional Prometheus metrics render function.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Users, tasks, and the completion commit.
    pub records: Arc<dyn RecordStore>,
    /// Friend edges and the mirrored scores.
    pub graph: Arc<dyn GraphStore>,
    /// Pending friend requests.
    pub requests: Arc<dyn FriendRequestStore>,
    pub orchestrator: Arc<CompletionOrchestrator>,
    pub auth: AuthConfig,
    pub health: HealthState,
}

/// Gateway server configuration (mirrors the `[server]` config section).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the full application router.
///
/// - `GET /health`, `GET /metrics` are public
/// - everything under `/api` requires the `x-api-key` header
pub fn build_router(state: GatewayState) -> Router {
    let auth_state = state.auth.clone();

    let public_routes = Router::new()
        .route("/health", get(handlers::get_public_health))
        .route("/metrics", get(handlers::get_public_metrics))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/api/create-user", post(handlers::users::create_user))
        .route(
            "/api/user/{user_id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route("/api/dashboard/{user_id}", get(handlers::users::dashboard))
        .route("/api/search-friend/{name}", get(handlers::friends::search))
        .route("/api/add-friend", post(handlers::friends::add_friend))
        .route(
            "/api/friend-requests/{user_id}",
            get(handlers::friends::list_requests),
        )
        .route("/api/accept-friend", post(handlers::friends::accept))
        .route("/api/reject-friend", post(handlers::friends::reject))
        .route("/api/friends/{user_id}", get(handlers::friends::friends))
        .route(
            "/api/leaderboard/{user_id}",
            get(handlers::friends::leaderboard),
        )
        .route("/api/new-task", post(handlers::tasks::create_task))
        .route("/api/tasks/user/{user_id}", get(handlers::tasks::list_tasks))
        .route(
            "/api/task/{task_id}/user/{user_id}",
            get(handlers::tasks::get_task).put(handlers::tasks::update_task),
        )
        .route(
            "/api/user/{user_id}/complete-task/{task_id}",
            put(handlers::completion::complete_task),
        )
        .route(
            "/api/user/{user_id}/task/{task_id}",
            delete(handlers::tasks::delete_task),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .route_layer(axum_middleware::from_fn(handlers::track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve the gateway until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), TaskerError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TaskerError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    let local = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or(addr);
    tracing::info!("gateway listening on {local}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| TaskerError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("gateway stopped");
    Ok(())
}

// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers, one module per resource.

pub mod completion;
pub mod friends;
pub mod tasks;
pub mod users;

use axum::{
    Json,
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use tasker_core::{HealthStatus, StoreAdapter};

use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub version: String,
    pub uptime_secs: u64,
}

/// GET /health
///
/// 200 while the store answers, 503 otherwise.
pub async fn get_public_health(State(state): State<GatewayState>) -> Response {
    let health = state
        .records
        .health_check()
        .await
        .unwrap_or_else(|e| HealthStatus::Unhealthy(e.to_string()));
    let (code, status, detail) = match health {
        HealthStatus::Healthy => (StatusCode::OK, "healthy", None),
        HealthStatus::Degraded(d) => (StatusCode::OK, "degraded", Some(d)),
        HealthStatus::Unhealthy(d) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", Some(d)),
    };
    let body = HealthResponse {
        status: status.to_string(),
        store: state.records.name().to_string(),
        detail,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    };
    (code, Json(body)).into_response()
}

/// GET /metrics
///
/// Prometheus text format, or 404 when metrics are disabled.
pub async fn get_public_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Count every routed request by matched path and status.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let response = next.run(request).await;
    tasker_prometheus::record_http_request(&route, response.status().as_u16());
    response
}

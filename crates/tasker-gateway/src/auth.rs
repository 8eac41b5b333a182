// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static API-key authentication.
//!
//! Clients send the key in the `x-api-key` header. When no key is
//! configured, all requests are rejected (fail-closed).

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use tasker_core::TaskerError;

use crate::error::ApiError;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Authentication configuration for the gateway.
#[derive(Clone)]
pub struct AuthConfig {
    /// Expected API key. `None` disables every authenticated route.
    pub api_key: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Middleware that checks the `x-api-key` header against the configured key.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = auth.api_key.as_deref() else {
        tracing::error!("gateway has no API key configured, rejecting request");
        return Err(TaskerError::Unauthorized.into());
    };

    let authorized = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        == Some(expected);

    if authorized {
        Ok(next.run(request).await)
    } else {
        tracing::debug!(path = %request.uri().path(), "rejected request with missing or wrong API key");
        Err(TaskerError::Unauthorized.into())
    }
}

// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Social Tasker backend.
//!
//! Exposes the user, task, friend, and completion endpoints under `/api`
//! behind a static API key, plus public `/health` and `/metrics`.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;
pub mod validation;

pub use auth::AuthConfig;
pub use error::{ApiError, ErrorResponse};
pub use server::{GatewayState, HealthState, ServerConfig, build_router, start_server};

// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task completion scoring for Social Tasker.
//!
//! - **Engine**: pure score and streak computation for one completion
//! - **Orchestrator**: loads records, scores, commits atomically, mirrors the score
//! - **Mirror**: background retry of failed graph mirror writes

pub mod engine;
pub mod mirror;
pub mod orchestrator;
pub mod recording;

pub use engine::{ScoreBreakdown, ScoreOutcome, ScoringTask, StreakState, score_completion};
pub use mirror::{MirrorHandle, MirrorRetryWorker};
pub use orchestrator::{CompletionOrchestrator, CompletionPhase, CompletionReceipt, MirrorStatus};

// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure scoring of a single task completion.
//!
//! Given the user's streak state and the task being completed, derive the
//! score delta and the new streak counters. The engine never reads a clock
//! and never touches a store; the caller supplies `now` and applies the
//! result.
//!
//! Rules, applied in order:
//!
//! 1. Day streak advances by one; every seventh day resets it and advances
//!    the week streak.
//! 2. Priority bonus: high 25, medium 15, low 5, anything else 0.
//! 3. When the last completion was one (rounded) day ago, add 20 per prior
//!    day-streak unit and 50 per prior week-streak unit.
//! 4. Completing before the due date adds 50.
//! 5. Planning ahead adds twice the real-valued days from creation to due.
//! 6. The sum is rounded.
//! 7. A gap of more than five days costs 50; more than one day costs 25.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tasker_core::time::{days_between, round_half_up};
use tasker_core::{Priority, RawPriority, TaskRecord, TaskerError, UserRecord};

/// Completions per week streak unit.
pub const DAYS_PER_WEEK_STREAK: u32 = 7;

const DAILY_STREAK_BONUS: i64 = 20;
const WEEKLY_STREAK_BONUS: i64 = 50;
const ON_TIME_BONUS: i64 = 50;
const PLANNING_BONUS_PER_DAY: f64 = 2.0;
const LONG_GAP_DAYS: i64 = 5;
const LONG_GAP_PENALTY: i64 = 50;
const SHORT_GAP_PENALTY: i64 = 25;

/// The user's streak state before a completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakState {
    pub day_streak: u32,
    pub week_streak: u32,
    pub last_completed: Option<DateTime<Utc>>,
}

impl From<&UserRecord> for StreakState {
    fn from(user: &UserRecord) -> Self {
        Self {
            day_streak: user.task_day_streak,
            week_streak: user.task_week_streak,
            last_completed: user.last_task_completed_date,
        }
    }
}

/// The task fields the engine reads. Timestamps are optional because stored
/// records may lack them; the engine rejects such tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringTask<'a> {
    pub priority: Option<&'a RawPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl<'a> From<&'a TaskRecord> for ScoringTask<'a> {
    fn from(task: &'a TaskRecord) -> Self {
        Self {
            priority: task.priority.as_ref(),
            due_date: task.due_date,
            created_at: task.created_at,
        }
    }
}

/// How each rule contributed to a delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub priority_bonus: i64,
    pub streak_bonus: i64,
    pub on_time_bonus: i64,
    /// Real-valued; only the rounded total is integral.
    pub planning_bonus: f64,
    /// Zero or negative.
    pub gap_penalty: i64,
    /// Rounded whole days since the last completion, if there was one.
    pub days_since_last: Option<i64>,
}

/// Result of scoring one completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreOutcome {
    pub score_delta: i64,
    pub day_streak: u32,
    pub week_streak: u32,
    pub breakdown: ScoreBreakdown,
}

/// Advance the streak counters by one completion.
pub fn advance_streak(day_streak: u32, week_streak: u32) -> (u32, u32) {
    let next = day_streak.saturating_add(1);
    if next % DAYS_PER_WEEK_STREAK == 0 {
        (0, week_streak.saturating_add(1))
    } else {
        (next, week_streak)
    }
}

/// Bonus for the task's priority. Absent or unrecognized text scores 0;
/// a non-text value is rejected.
pub fn priority_bonus(priority: Option<&RawPriority>) -> Result<i64, TaskerError> {
    let Some(raw) = priority else {
        return Ok(0);
    };
    if let RawPriority::NonText(value) = raw {
        return Err(TaskerError::InvalidPriority(format!(
            "priority must be a string, got {value}"
        )));
    }
    Ok(match raw.recognized() {
        Some(Priority::High) => 25,
        Some(Priority::Medium) => 15,
        Some(Priority::Low) => 5,
        None => 0,
    })
}

/// Score one completion at `now`.
pub fn score_completion(
    prior: &StreakState,
    task: &ScoringTask<'_>,
    now: DateTime<Utc>,
) -> Result<ScoreOutcome, TaskerError> {
    let due_date = task
        .due_date
        .ok_or_else(|| TaskerError::InvalidTask("task has no valid due date".into()))?;
    let created_at = task
        .created_at
        .ok_or_else(|| TaskerError::InvalidTask("task has no valid creation date".into()))?;

    let (day_streak, week_streak) = advance_streak(prior.day_streak, prior.week_streak);
    let days_since_last = prior
        .last_completed
        .map(|last| round_half_up(days_between(last, now)));

    let mut breakdown = ScoreBreakdown {
        priority_bonus: priority_bonus(task.priority)?,
        days_since_last,
        ..ScoreBreakdown::default()
    };

    if days_since_last == Some(1) {
        breakdown.streak_bonus = DAILY_STREAK_BONUS * i64::from(prior.day_streak)
            + WEEKLY_STREAK_BONUS * i64::from(prior.week_streak);
    }
    if due_date > now {
        breakdown.on_time_bonus = ON_TIME_BONUS;
    }
    breakdown.planning_bonus = PLANNING_BONUS_PER_DAY * days_between(created_at, due_date);

    let accumulated = (breakdown.priority_bonus + breakdown.streak_bonus + breakdown.on_time_bonus)
        as f64
        + breakdown.planning_bonus;
    let mut score_delta = round_half_up(accumulated);

    if let Some(gap) = days_since_last {
        if gap > LONG_GAP_DAYS {
            breakdown.gap_penalty = -LONG_GAP_PENALTY;
        } else if gap > 1 {
            breakdown.gap_penalty = -SHORT_GAP_PENALTY;
        }
    }
    score_delta += breakdown.gap_penalty;

    Ok(ScoreOutcome {
        score_delta,
        day_streak,
        week_streak,
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn text(s: &str) -> RawPriority {
        RawPriority::Text(s.to_string())
    }

    #[test]
    fn priority_bonuses_are_exact() {
        for (priority, bonus) in [("high", 25), ("medium", 15), ("low", 5), ("urgent", 0)] {
            assert_eq!(priority_bonus(Some(&text(priority))).unwrap(), bonus, "{priority}");
        }
        assert_eq!(priority_bonus(None).unwrap(), 0);
    }

    #[test]
    fn non_text_priority_is_invalid() {
        let raw = RawPriority::NonText("3".into());
        let task = ScoringTask {
            priority: Some(&raw),
            due_date: Some(now()),
            created_at: Some(now()),
        };
        let err = score_completion(&StreakState::default(), &task, now()).unwrap_err();
        assert!(matches!(err, TaskerError::InvalidPriority(_)));
    }

    #[test]
    fn missing_dates_are_invalid_task() {
        let high = text("high");
        let no_due = ScoringTask {
            priority: Some(&high),
            due_date: None,
            created_at: Some(now()),
        };
        let no_created = ScoringTask {
            priority: Some(&high),
            due_date: Some(now()),
            created_at: None,
        };
        for task in [no_due, no_created] {
            let err = score_completion(&StreakState::default(), &task, now()).unwrap_err();
            assert!(matches!(err, TaskerError::InvalidTask(_)));
        }
    }

    #[test]
    fn first_high_priority_completion_scores_81() {
        let high = text("high");
        let task = ScoringTask {
            priority: Some(&high),
            due_date: Some(now() + Duration::days(3)),
            created_at: Some(now()),
        };
        let outcome = score_completion(&StreakState::default(), &task, now()).unwrap();
        assert_eq!(outcome.score_delta, 81);
        assert_eq!(outcome.day_streak, 1);
        assert_eq!(outcome.week_streak, 0);
        assert_eq!(outcome.breakdown.days_since_last, None);
        assert_eq!(outcome.breakdown.gap_penalty, 0);
    }

    fn gap_outcome(days_ago: i64, day_streak: u32) -> ScoreOutcome {
        // Neutral task: unknown priority, overdue, zero planning window.
        let other = text("other");
        let task = ScoringTask {
            priority: Some(&other),
            due_date: Some(now() - Duration::hours(1)),
            created_at: Some(now() - Duration::hours(1)),
        };
        let prior = StreakState {
            day_streak,
            week_streak: 0,
            last_completed: Some(now() - Duration::days(days_ago)),
        };
        score_completion(&prior, &task, now()).unwrap()
    }

    #[test]
    fn gap_of_six_days_costs_50() {
        assert_eq!(gap_outcome(6, 0).score_delta, -50);
    }

    #[test]
    fn gap_of_three_days_costs_25() {
        assert_eq!(gap_outcome(3, 0).score_delta, -25);
    }

    #[test]
    fn gap_of_eleven_days_uses_the_long_tier_only() {
        assert_eq!(gap_outcome(11, 0).score_delta, -50);
    }

    #[test]
    fn next_day_completion_earns_prior_streak_bonus() {
        let outcome = gap_outcome(1, 2);
        assert_eq!(outcome.score_delta, 40);
        assert_eq!(outcome.breakdown.streak_bonus, 40);
        assert_eq!(outcome.breakdown.gap_penalty, 0);
        assert_eq!(outcome.day_streak, 3);
    }

    #[test]
    fn same_day_completion_has_no_bonus_or_penalty() {
        let outcome = gap_outcome(0, 4);
        assert_eq!(outcome.score_delta, 0);
        assert_eq!(outcome.day_streak, 5);
    }

    #[test]
    fn gap_uses_rounded_days() {
        // 1.4 days rounds to 1: bonus branch, no penalty.
        let other = text("other");
        let task = ScoringTask {
            priority: Some(&other),
            due_date: Some(now() - Duration::hours(1)),
            created_at: Some(now() - Duration::hours(1)),
        };
        let prior = StreakState {
            day_streak: 1,
            week_streak: 1,
            last_completed: Some(now() - Duration::hours(34)),
        };
        let outcome = score_completion(&prior, &task, now()).unwrap();
        assert_eq!(outcome.breakdown.days_since_last, Some(1));
        assert_eq!(outcome.score_delta, 70);
    }

    #[test]
    fn seventh_day_rolls_into_week_streak_scenario() {
        let medium = text("medium");
        let task = ScoringTask {
            priority: Some(&medium),
            due_date: Some(now() + Duration::days(1)),
            created_at: Some(now() - Duration::days(5)),
        };
        let prior = StreakState {
            day_streak: 6,
            week_streak: 0,
            last_completed: Some(now() - Duration::days(1)),
        };
        let outcome = score_completion(&prior, &task, now()).unwrap();
        assert_eq!(outcome.day_streak, 0);
        assert_eq!(outcome.week_streak, 1);
        assert_eq!(outcome.breakdown.priority_bonus, 15);
        assert_eq!(outcome.breakdown.streak_bonus, 120);
        assert_eq!(outcome.breakdown.on_time_bonus, 50);
        assert_eq!(outcome.score_delta, 197);
        assert_eq!(100 + outcome.score_delta, 297);
    }

    #[test]
    fn due_before_creation_subtracts() {
        let low = text("low");
        let task = ScoringTask {
            priority: Some(&low),
            due_date: Some(now() - Duration::days(4)),
            created_at: Some(now() - Duration::days(2)),
        };
        let outcome = score_completion(&StreakState::default(), &task, now()).unwrap();
        // 5 + 0 + 2 * -2
        assert_eq!(outcome.score_delta, 1);
    }

    #[test]
    fn planning_bonus_rounds_half_up() {
        // 1.25 days of planning gives 2.5, which rounds to 3.
        let other = text("other");
        let task = ScoringTask {
            priority: Some(&other),
            due_date: Some(now() - Duration::hours(1)),
            created_at: Some(now() - Duration::hours(31)),
        };
        let outcome = score_completion(&StreakState::default(), &task, now()).unwrap();
        assert_eq!(outcome.score_delta, 3);
    }

    proptest! {
        #[test]
        fn streak_advances_modulo_seven(day in 0u32..10_000, week in 0u32..10_000) {
            let (new_day, new_week) = advance_streak(day, week);
            prop_assert_eq!(new_day, (day + 1) % 7);
            if (day + 1) % 7 == 0 {
                prop_assert_eq!(new_week, week + 1);
            } else {
                prop_assert_eq!(new_week, week);
            }
        }

        #[test]
        fn unrecognized_priorities_score_zero(s in "[a-z]{0,12}") {
            prop_assume!(!["low", "medium", "high"].contains(&s.as_str()));
            prop_assert_eq!(priority_bonus(Some(&RawPriority::Text(s))).unwrap(), 0);
        }
    }
}

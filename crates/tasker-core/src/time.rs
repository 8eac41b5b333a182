// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timestamp helpers shared by storage, scoring, and the gateway.
//!
//! Timestamps travel as Unix milliseconds (what the mobile client sends) but
//! RFC 3339 strings and bare `YYYY-MM-DD` dates are accepted on input.

use chrono::{DateTime, NaiveDate, Utc};

/// Milliseconds in one day.
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Convert Unix milliseconds to a UTC timestamp.
pub fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

/// Parse a textual timestamp: RFC 3339, integer milliseconds, or a bare date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ms) = raw.parse::<i64>() {
        return from_millis(ms);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Real-valued number of days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MS_PER_DAY
}

/// Round to the nearest integer with halves rounded towards positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

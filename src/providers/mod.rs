// ABOUTME: Provider clients and normalizers for WHOOP and Withings
// ABOUTME: Shared date-range resolution and unit conversion helpers live here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! # Provider clients
//!
//! One module per upstream. Each client builds authenticated requests
//! against the provider API and hands raw records to pure normalizer
//! functions in the same module. Records whose completeness marker says the
//! upstream is still processing are filtered, never surfaced.

/// WHOOP cycles, recoveries, and workouts
pub mod whoop;
/// Withings weight measurement groups
pub mod withings;

use crate::constants::DEFAULT_RANGE_DAYS;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Resolved query window. Either bound may be absent, in which case the
/// corresponding request parameter is omitted entirely rather than sent
/// empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    /// Inclusive lower bound
    pub start: Option<DateTime<Utc>>,
    /// Exclusive upper bound
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// The trailing `days` ending now
    #[must_use]
    pub fn last_days(days: i64) -> Self {
        let now = Utc::now();
        Self {
            start: Some(now - Duration::days(days)),
            end: Some(now),
        }
    }

    /// Resolve tool arguments into a range. Precedence: explicit dates win
    /// over `days`; with nothing supplied the default window applies.
    pub fn resolve(
        start_date: Option<&str>,
        end_date: Option<&str>,
        days: Option<i64>,
    ) -> AppResult<Self> {
        if start_date.is_some() || end_date.is_some() {
            return Ok(Self {
                start: start_date.map(parse_date_arg).transpose()?,
                end: end_date.map(parse_date_arg).transpose()?,
            });
        }
        match days {
            Some(days) if days > 0 => Ok(Self::last_days(days)),
            Some(days) => Err(AppError::InvalidInput(format!(
                "days must be positive, got {days}"
            ))),
            None => Ok(Self::last_days(DEFAULT_RANGE_DAYS)),
        }
    }
}

/// Accepts either a bare ISO date or a full RFC 3339 timestamp
fn parse_date_arg(raw: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| {
            AppError::InvalidInput(format!(
                "expected YYYY-MM-DD or RFC 3339 timestamp, got {raw:?}"
            ))
        })
        .map(|d| {
            d.and_hms_opt(0, 0, 0)
                .unwrap_or_default()
                .and_utc()
        })
}

/// Kilojoules to whole calories
#[must_use]
pub fn kilojoules_to_calories(kilojoules: f64) -> i64 {
    (kilojoules * 0.239).round() as i64
}

/// Round to one decimal (strain, hrv)
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimals (body composition)
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Whole minutes between two instants, rounded
#[must_use]
pub fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds();
    (millis as f64 / 60_000.0).round() as i64
}

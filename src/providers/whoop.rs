// ABOUTME: WHOOP API client and normalizers for cycles, recoveries, and workouts
// ABOUTME: Score-state gating, kJ→kcal conversion, and the daily-stats merge live here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! # WHOOP provider
//!
//! Fetches cycles, recoveries, and workouts from the WHOOP developer API and
//! normalizes them into [`DailyStats`] and [`WorkoutSummary`] values. Only
//! records whose `score_state` is `SCORED` are eligible; pending and
//! unscorable records are filtered silently.
//!
//! Collection endpoints are paginated upstream, but this client reads a
//! single page per call: the `next_token` is observed and logged, never
//! followed. Known limitation, kept on purpose.

use super::{duration_minutes, kilojoules_to_calories, round1, DateRange};
use crate::constants::{providers, whoop};
use crate::errors::{AppError, AppResult};
use crate::models::{DailyStats, RecoverySummary, WorkoutSummary};
use crate::utils::http_client::shared_client;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::Write;
use tracing::{debug, warn};

// ============================================================================
// WHOOP API response structures
// ============================================================================

/// Completeness marker attached to every scored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreState {
    /// Derived metrics are final
    Scored,
    /// Upstream is still processing
    PendingScore,
    /// Upstream gave up on scoring this record
    Unscorable,
    /// Forward compatibility with states added upstream
    #[serde(other)]
    Unknown,
}

impl ScoreState {
    /// Only fully scored records are eligible for normalization
    #[must_use]
    pub fn is_scored(self) -> bool {
        matches!(self, Self::Scored)
    }
}

/// Pagination wrapper for WHOOP collection responses
#[derive(Debug, Deserialize)]
struct WhoopPage<T> {
    records: Vec<T>,
    next_token: Option<String>,
}

/// Daily physiological cycle
#[derive(Debug, Clone, Deserialize)]
pub struct WhoopCycle {
    /// Cycle id, the join key for recoveries
    pub id: i64,
    /// Cycle start (ISO 8601)
    pub start: String,
    /// Completeness marker
    pub score_state: ScoreState,
    /// Strain and energy figures, present once scored
    pub score: Option<WhoopCycleScore>,
}

/// Cycle score block
#[derive(Debug, Clone, Deserialize)]
pub struct WhoopCycleScore {
    /// Day strain (0-21)
    pub strain: Option<f64>,
    /// Energy expenditure in kilojoules
    pub kilojoule: Option<f64>,
    /// Average heart rate over the cycle
    pub average_heart_rate: Option<i64>,
    /// Max heart rate over the cycle
    pub max_heart_rate: Option<i64>,
}

/// Recovery for one cycle
#[derive(Debug, Clone, Deserialize)]
pub struct WhoopRecovery {
    /// Cycle this recovery belongs to
    pub cycle_id: i64,
    /// Completeness marker
    pub score_state: ScoreState,
    /// Recovery figures, present once scored
    pub score: Option<WhoopRecoveryScore>,
}

/// Recovery score block
#[derive(Debug, Clone, Deserialize)]
pub struct WhoopRecoveryScore {
    /// Recovery score percentage (0-100)
    pub recovery_score: Option<f64>,
    /// Resting heart rate
    pub resting_heart_rate: Option<f64>,
    /// Heart rate variability (RMSSD) in milliseconds
    pub hrv_rmssd_milli: Option<f64>,
    /// Skin temperature in Celsius
    pub skin_temp_celsius: Option<f64>,
}

/// A workout
#[derive(Debug, Clone, Deserialize)]
pub struct WhoopWorkout {
    /// Workout id (UUID string in v2)
    pub id: String,
    /// WHOOP internal sport classification
    pub sport_id: i32,
    /// Workout start (ISO 8601)
    pub start: String,
    /// Workout end (ISO 8601)
    pub end: String,
    /// Completeness marker
    pub score_state: ScoreState,
    /// Workout figures, present once scored
    pub score: Option<WhoopWorkoutScore>,
}

/// Workout score block
#[derive(Debug, Clone, Deserialize)]
pub struct WhoopWorkoutScore {
    /// Workout strain (0-21)
    pub strain: Option<f64>,
    /// Average heart rate
    pub average_heart_rate: Option<i64>,
    /// Max heart rate
    pub max_heart_rate: Option<i64>,
    /// Energy expenditure in kilojoules
    pub kilojoule: Option<f64>,
    /// Distance in meters
    pub distance_meter: Option<f64>,
}

// ============================================================================
// Client
// ============================================================================

/// WHOOP API client
pub struct WhoopClient {
    base_url: String,
}

impl WhoopClient {
    /// Client against the production API
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: whoop::API_BASE_URL.to_owned(),
        }
    }

    /// Client against a custom base URL
    #[must_use]
    pub const fn with_base_url(base_url: String) -> Self {
        Self { base_url }
    }

    /// Fetch one page of cycles in the range
    pub async fn get_cycles(
        &self,
        access_token: &str,
        range: DateRange,
    ) -> AppResult<Vec<WhoopCycle>> {
        self.get_collection("cycle", access_token, range).await
    }

    /// Fetch one page of recoveries in the range
    pub async fn get_recoveries(
        &self,
        access_token: &str,
        range: DateRange,
    ) -> AppResult<Vec<WhoopRecovery>> {
        self.get_collection("recovery", access_token, range).await
    }

    /// Fetch one page of workouts in the range
    pub async fn get_workouts(
        &self,
        access_token: &str,
        range: DateRange,
    ) -> AppResult<Vec<WhoopWorkout>> {
        self.get_collection("activity/workout", access_token, range)
            .await
    }

    async fn get_collection<T>(
        &self,
        endpoint: &str,
        access_token: &str,
        range: DateRange,
    ) -> AppResult<Vec<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = self.collection_url(endpoint, range);
        debug!(provider = providers::WHOOP, %url, "fetching collection");

        let response = shared_client()
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::transport(providers::WHOOP, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamRequestFailed {
                provider: providers::WHOOP,
                status: status.as_u16(),
                body,
            });
        }

        let page: WhoopPage<T> = response
            .json()
            .await
            .map_err(|e| AppError::invalid_response(providers::WHOOP, e.to_string()))?;

        if page.next_token.is_some() {
            // Single page per call; further pages exist but are not followed.
            debug!(
                provider = providers::WHOOP,
                endpoint, "more pages available upstream, returning first page only"
            );
        }
        Ok(page.records)
    }

    fn collection_url(&self, endpoint: &str, range: DateRange) -> String {
        let mut url = format!(
            "{}/{}?limit={}",
            self.base_url,
            endpoint,
            whoop::PAGE_LIMIT
        );
        if let Some(start) = range.start {
            let _ = write!(url, "&start={}", start.format("%Y-%m-%dT%H:%M:%S%.3fZ"));
        }
        if let Some(end) = range.end {
            let _ = write!(url, "&end={}", end.format("%Y-%m-%dT%H:%M:%S%.3fZ"));
        }
        url
    }
}

impl Default for WhoopClient {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Normalizers
// ============================================================================

/// Flat sport name for a WHOOP sport id
#[must_use]
pub fn sport_name(sport_id: i32) -> String {
    let name = match sport_id {
        0 => "activity",
        1 | 33 => "running",
        34 => "treadmill_running",
        16 => "cycling",
        17 => "spinning",
        18 => "mountain_biking",
        43 | 44 => "swimming",
        48 => "rowing",
        63 => "yoga",
        64 => "pilates",
        71 => "weightlifting",
        45 => "snowboarding",
        46 => "alpine_skiing",
        47 => "cross_country_skiing",
        50 => "walking",
        52 => "hiking",
        54 => "climbing",
        82 => "golf",
        83 => "tennis",
        84 => "basketball",
        85 => "soccer",
        _ => return format!("whoop_sport_{sport_id}"),
    };
    name.to_owned()
}

/// Merge cycles and recoveries into daily stats, joined by cycle id.
///
/// Only scored cycles produce output; a cycle with no matching scored
/// recovery still emits, with the recovery block omitted.
#[must_use]
pub fn daily_stats(cycles: &[WhoopCycle], recoveries: &[WhoopRecovery]) -> Vec<DailyStats> {
    let scored_recoveries: HashMap<i64, &WhoopRecoveryScore> = recoveries
        .iter()
        .filter(|r| r.score_state.is_scored())
        .filter_map(|r| r.score.as_ref().map(|s| (r.cycle_id, s)))
        .collect();

    cycles
        .iter()
        .filter(|c| c.score_state.is_scored())
        .map(|cycle| {
            let score = cycle.score.as_ref();
            DailyStats {
                date: cycle.start.clone(),
                strain: score.and_then(|s| s.strain).map(round1),
                calories_burned: score
                    .and_then(|s| s.kilojoule)
                    .map(kilojoules_to_calories),
                average_heart_rate: score.and_then(|s| s.average_heart_rate),
                max_heart_rate: score.and_then(|s| s.max_heart_rate),
                recovery: scored_recoveries.get(&cycle.id).map(|r| RecoverySummary {
                    score: r.recovery_score.map(|s| s.round() as i64),
                    resting_heart_rate: r.resting_heart_rate.map(|h| h.round() as i64),
                    hrv: r.hrv_rmssd_milli.map(round1),
                    skin_temp_celsius: r.skin_temp_celsius.map(round1),
                }),
            }
        })
        .collect()
}

/// Normalize scored workouts. Records with unparseable timestamps are
/// skipped with a warning rather than failing the whole batch.
#[must_use]
pub fn workout_summaries(workouts: &[WhoopWorkout]) -> Vec<WorkoutSummary> {
    workouts
        .iter()
        .filter(|w| w.score_state.is_scored())
        .filter_map(|workout| match summarize_workout(workout) {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(provider = providers::WHOOP, id = %workout.id, "skipping workout: {e}");
                None
            }
        })
        .collect()
}

fn summarize_workout(workout: &WhoopWorkout) -> AppResult<WorkoutSummary> {
    let start = parse_timestamp(&workout.start)?;
    let end = parse_timestamp(&workout.end)?;
    let score = workout.score.as_ref();
    Ok(WorkoutSummary {
        id: workout.id.clone(),
        sport: sport_name(workout.sport_id),
        start: workout.start.clone(),
        end: workout.end.clone(),
        duration: duration_minutes(start, end),
        strain: score.and_then(|s| s.strain).map(round1),
        calories_burned: score.and_then(|s| s.kilojoule).map(kilojoules_to_calories),
        distance_meters: score
            .and_then(|s| s.distance_meter)
            .map(|d| d.round() as i64),
        average_heart_rate: score.and_then(|s| s.average_heart_rate),
        max_heart_rate: score.and_then(|s| s.max_heart_rate),
    })
}

fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| AppError::invalid_response(providers::WHOOP, format!("bad timestamp {raw:?}: {e}")))
}

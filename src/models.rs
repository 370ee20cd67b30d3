// ABOUTME: Provider-agnostic output models returned by the MCP tools
// ABOUTME: Flat camelCase shapes with fixed rounding so repeated fetches stay stable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! Normalized result types.
//!
//! Every type here is output-only: built from a fully scored/complete
//! provider record, never fed back upstream. Floats are rounded before they
//! land in these structs (1 decimal for strain/hrv, 2 decimals for body
//! composition, whole numbers for calories and distance).

use serde::{Deserialize, Serialize};

/// One day's physiological load, with its recovery if the upstream has
/// finished scoring it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    /// ISO-8601 start of the physiological cycle
    pub date: String,
    /// Day strain on the 0-21 scale, 1 decimal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strain: Option<f64>,
    /// Whole calories burned over the cycle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_burned: Option<i64>,
    /// Average heart rate over the cycle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_heart_rate: Option<i64>,
    /// Maximum heart rate over the cycle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_heart_rate: Option<i64>,
    /// Scored recovery joined by cycle id; omitted when the recovery is
    /// missing or still pending
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery: Option<RecoverySummary>,
}

/// Recovery block nested inside [`DailyStats`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoverySummary {
    /// Recovery score percentage, whole number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    /// Resting heart rate, whole bpm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resting_heart_rate: Option<i64>,
    /// Heart rate variability (RMSSD) in milliseconds, 1 decimal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hrv: Option<f64>,
    /// Skin temperature in Celsius, 1 decimal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin_temp_celsius: Option<f64>,
}

/// A single scored workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    /// Upstream workout id
    pub id: String,
    /// Denormalized sport name (flat string, never a provider enum)
    pub sport: String,
    /// ISO-8601 workout start
    pub start: String,
    /// ISO-8601 workout end
    pub end: String,
    /// Whole minutes between start and end
    pub duration: i64,
    /// Workout strain, 1 decimal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strain: Option<f64>,
    /// Whole calories burned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_burned: Option<i64>,
    /// Whole meters covered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<i64>,
    /// Average heart rate in bpm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_heart_rate: Option<i64>,
    /// Maximum heart rate in bpm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_heart_rate: Option<i64>,
}

/// One decoded weight measurement group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightPoint {
    /// ISO-8601 timestamp of the measurement group
    pub date: String,
    /// Weight in kilograms, 2 decimals; groups decoding to exactly 0 are
    /// dropped before this struct is built
    pub weight_kg: f64,
    /// Body fat ratio percentage, 2 decimals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat_ratio_percent: Option<f64>,
    /// Muscle mass in kilograms, 2 decimals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muscle_mass_kg: Option<f64>,
    /// Hydration in kilograms, 2 decimals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hydration_kg: Option<f64>,
    /// Bone mass in kilograms, 2 decimals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bone_mass_kg: Option<f64>,
}

/// Per-provider connection report returned by `get_connection_status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    /// Provider name
    pub provider: String,
    /// Whether OAuth app credentials are configured
    pub configured: bool,
    /// Whether a token record is currently loadable
    pub connected: bool,
}

impl ConnectionStatus {
    /// Status for a provider with no OAuth app credentials
    #[must_use]
    pub fn unconfigured(provider: &str) -> Self {
        Self {
            provider: provider.to_owned(),
            configured: false,
            connected: false,
        }
    }
}

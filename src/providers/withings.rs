// ABOUTME: Withings measure API client and weight normalizer
// ABOUTME: Decodes value*10^unit fixed-point measures and gates on real (category 1) groups

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! # Withings provider
//!
//! Fetches measurement groups from the Withings measure endpoint and
//! normalizes them into [`WeightPoint`] values. Withings encodes every
//! measure as fixed-point: the real value is `value * 10^unit` (the unit
//! exponent is usually negative). Only category 1 groups — real measures,
//! as opposed to user objectives — are considered, and a group whose
//! decoded weight is zero is dropped as a device artifact.
//!
//! Like the token endpoint, the measure endpoint answers HTTP 200 for
//! everything and signals errors through a nonzero envelope `status`.

use super::round2;
use crate::constants::{providers, withings};
use crate::errors::{AppError, AppResult};
use crate::models::WeightPoint;
use crate::utils::http_client::shared_client;
use chrono::DateTime;
use serde::Deserialize;
use tracing::debug;

/// Measure type codes used by the weight query
mod measure_types {
    pub const WEIGHT_KG: i32 = 1;
    pub const FAT_RATIO_PERCENT: i32 = 6;
    pub const MUSCLE_MASS_KG: i32 = 76;
    pub const HYDRATION_KG: i32 = 77;
    pub const BONE_MASS_KG: i32 = 88;
}

/// Envelope every Withings API response arrives in
#[derive(Debug, Deserialize)]
struct MeasureEnvelope {
    status: i64,
    body: Option<MeasureBody>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MeasureBody {
    measuregrps: Vec<MeasureGroup>,
}

/// One measurement session on the scale
#[derive(Debug, Clone, Deserialize)]
pub struct MeasureGroup {
    /// Measurement time, epoch seconds
    pub date: i64,
    /// 1 = real measure, 2 = user objective
    pub category: i32,
    /// Fixed-point measures taken in this session
    pub measures: Vec<Measure>,
}

/// A single fixed-point measure
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Measure {
    /// Raw integer value
    pub value: i64,
    /// Power-of-ten exponent applied to `value`
    pub unit: i32,
    /// Measure type code
    #[serde(rename = "type")]
    pub measure_type: i32,
}

impl Measure {
    /// The real value: `value * 10^unit`
    #[must_use]
    pub fn decode(self) -> f64 {
        self.value as f64 * 10f64.powi(self.unit)
    }
}

/// Withings measure API client
pub struct WithingsClient {
    measure_url: String,
}

impl WithingsClient {
    /// Client against the production API
    #[must_use]
    pub fn new() -> Self {
        Self {
            measure_url: withings::MEASURE_URL.to_owned(),
        }
    }

    /// Client against a custom measure endpoint
    #[must_use]
    pub const fn with_measure_url(measure_url: String) -> Self {
        Self { measure_url }
    }

    /// Fetch measurement groups for the body-composition measure types,
    /// optionally bounded by epoch-second timestamps.
    pub async fn get_measure_groups(
        &self,
        access_token: &str,
        start: Option<i64>,
        end: Option<i64>,
    ) -> AppResult<Vec<MeasureGroup>> {
        let mut params: Vec<(&str, String)> = vec![
            ("action", "getmeas".to_owned()),
            ("meastypes", withings::MEASURE_TYPES.to_owned()),
            ("category", "1".to_owned()),
        ];
        if let Some(start) = start {
            params.push(("startdate", start.to_string()));
        }
        if let Some(end) = end {
            params.push(("enddate", end.to_string()));
        }
        debug!(provider = providers::WITHINGS, "fetching measure groups");

        let response = shared_client()
            .post(&self.measure_url)
            .bearer_auth(access_token)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::transport(providers::WITHINGS, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamRequestFailed {
                provider: providers::WITHINGS,
                status: status.as_u16(),
                body,
            });
        }

        let envelope: MeasureEnvelope = response
            .json()
            .await
            .map_err(|e| AppError::invalid_response(providers::WITHINGS, e.to_string()))?;
        if envelope.status != 0 {
            return Err(AppError::UpstreamRequestFailed {
                provider: providers::WITHINGS,
                status: envelope.status as u16,
                body: envelope
                    .error
                    .unwrap_or_else(|| "measure request rejected".to_owned()),
            });
        }
        Ok(envelope
            .body
            .ok_or_else(|| {
                AppError::invalid_response(providers::WITHINGS, "measure envelope missing body")
            })?
            .measuregrps)
    }
}

impl Default for WithingsClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize measurement groups into weight points, newest first as the
/// API returns them. Non-real groups and zero-weight artifacts are dropped.
#[must_use]
pub fn weight_points(groups: &[MeasureGroup]) -> Vec<WeightPoint> {
    groups
        .iter()
        .filter(|g| g.category == 1)
        .filter_map(to_weight_point)
        .collect()
}

fn to_weight_point(group: &MeasureGroup) -> Option<WeightPoint> {
    let mut weight_kg = None;
    let mut fat_ratio_percent = None;
    let mut muscle_mass_kg = None;
    let mut hydration_kg = None;
    let mut bone_mass_kg = None;

    for measure in &group.measures {
        let value = round2(measure.decode());
        match measure.measure_type {
            measure_types::WEIGHT_KG => weight_kg = Some(value),
            measure_types::FAT_RATIO_PERCENT => fat_ratio_percent = Some(value),
            measure_types::MUSCLE_MASS_KG => muscle_mass_kg = Some(value),
            measure_types::HYDRATION_KG => hydration_kg = Some(value),
            measure_types::BONE_MASS_KG => bone_mass_kg = Some(value),
            _ => {}
        }
    }

    let weight_kg = weight_kg?;
    if weight_kg == 0.0 {
        // Scales occasionally record an empty step-on; not a real reading.
        return None;
    }
    Some(WeightPoint {
        date: DateTime::from_timestamp(group.date, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_default(),
        weight_kg,
        fat_ratio_percent,
        muscle_mass_kg,
        hydration_kg,
        bone_mass_kg,
    })
}

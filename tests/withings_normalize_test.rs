// ABOUTME: Normalization tests for Withings measurement groups
// ABOUTME: Fixed-point decode, category gating, zero-weight artifacts, rounding

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

#![allow(clippy::unwrap_used)]

use serde_json::json;
use vitals_mcp_server::providers::withings::{weight_points, Measure, MeasureGroup};

fn group(category: i32, measures: serde_json::Value) -> MeasureGroup {
    serde_json::from_value(json!({
        "date": 1_740_960_000, // 2025-03-03T00:00:00Z
        "category": category,
        "measures": measures,
    }))
    .unwrap()
}

#[test]
fn fixed_point_values_decode_with_the_unit_exponent() {
    let measure: Measure =
        serde_json::from_value(json!({ "value": 700, "unit": -2, "type": 1 })).unwrap();
    assert!((measure.decode() - 7.00).abs() < 1e-9);

    let measure: Measure =
        serde_json::from_value(json!({ "value": 72_500, "unit": -3, "type": 1 })).unwrap();
    assert!((measure.decode() - 72.5).abs() < 1e-9);
}

#[test]
fn a_full_group_becomes_one_weight_point() {
    let groups = vec![group(
        1,
        json!([
            { "value": 72_500, "unit": -3, "type": 1 },
            { "value": 2_215, "unit": -2, "type": 6 },
            { "value": 55_123, "unit": -3, "type": 76 },
            { "value": 40_250, "unit": -3, "type": 77 },
            { "value": 3_141, "unit": -3, "type": 88 },
        ]),
    )];

    let points = weight_points(&groups);
    assert_eq!(points.len(), 1);
    let point = &points[0];
    assert_eq!(point.weight_kg, 72.5);
    assert_eq!(point.fat_ratio_percent, Some(22.15));
    assert_eq!(point.muscle_mass_kg, Some(55.12));
    assert_eq!(point.hydration_kg, Some(40.25));
    assert_eq!(point.bone_mass_kg, Some(3.14));
    assert!(point.date.starts_with("2025-03-03"));
}

#[test]
fn values_round_to_two_decimals() {
    let groups = vec![group(1, json!([{ "value": 72_5678, "unit": -4, "type": 1 }]))];
    let points = weight_points(&groups);
    assert_eq!(points[0].weight_kg, 72.57);
}

#[test]
fn objective_groups_are_ignored() {
    let groups = vec![
        group(2, json!([{ "value": 70_000, "unit": -3, "type": 1 }])),
        group(1, json!([{ "value": 71_000, "unit": -3, "type": 1 }])),
    ];
    let points = weight_points(&groups);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].weight_kg, 71.0);
}

#[test]
fn zero_weight_groups_are_dropped_as_artifacts() {
    let groups = vec![group(
        1,
        json!([
            { "value": 0, "unit": -3, "type": 1 },
            { "value": 2_215, "unit": -2, "type": 6 },
        ]),
    )];
    assert!(weight_points(&groups).is_empty());
}

#[test]
fn group_without_a_weight_measure_is_dropped() {
    let groups = vec![group(1, json!([{ "value": 2_215, "unit": -2, "type": 6 }]))];
    assert!(weight_points(&groups).is_empty());
}

#[test]
fn unknown_measure_types_are_ignored_not_fatal() {
    let groups = vec![group(
        1,
        json!([
            { "value": 71_000, "unit": -3, "type": 1 },
            { "value": 123, "unit": 0, "type": 170 },
        ]),
    )];
    let points = weight_points(&groups);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].weight_kg, 71.0);
}

#[test]
fn serialized_point_uses_camel_case_and_omits_absent_fields() {
    let groups = vec![group(1, json!([{ "value": 71_000, "unit": -3, "type": 1 }]))];
    let value = serde_json::to_value(&weight_points(&groups)[0]).unwrap();
    assert_eq!(value["weightKg"], json!(71.0));
    assert!(value.get("fatRatioPercent").is_none());
}

// ABOUTME: Normalization tests for WHOOP cycles, recoveries, and workouts
// ABOUTME: Covers score-state gating, the cycle/recovery join, and unit conversions

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

#![allow(clippy::unwrap_used)]

use serde_json::json;
use vitals_mcp_server::providers::whoop::{
    daily_stats, sport_name, workout_summaries, WhoopCycle, WhoopRecovery, WhoopWorkout,
};

fn cycle(id: i64, state: &str, score: serde_json::Value) -> WhoopCycle {
    serde_json::from_value(json!({
        "id": id,
        "start": format!("2025-03-0{}T06:00:00.000Z", id),
        "score_state": state,
        "score": score,
    }))
    .unwrap()
}

fn recovery(cycle_id: i64, state: &str, score: serde_json::Value) -> WhoopRecovery {
    serde_json::from_value(json!({
        "cycle_id": cycle_id,
        "score_state": state,
        "score": score,
    }))
    .unwrap()
}

#[test]
fn scored_cycle_and_recovery_merge_into_one_day() {
    let cycles = vec![cycle(
        1,
        "SCORED",
        json!({
            "strain": 10.04,
            "kilojoule": 500.0,
            "average_heart_rate": 62,
            "max_heart_rate": 145,
        }),
    )];
    let recoveries = vec![recovery(
        1,
        "SCORED",
        json!({
            "recovery_score": 67.0,
            "resting_heart_rate": 52.0,
            "hrv_rmssd_milli": 42.3,
            "skin_temp_celsius": 33.71,
        }),
    )];

    let stats = daily_stats(&cycles, &recoveries);
    assert_eq!(stats.len(), 1);
    let day = &stats[0];
    assert_eq!(day.strain, Some(10.0));
    assert_eq!(day.calories_burned, Some(120)); // 500 kJ * 0.239 = 119.5
    assert_eq!(day.average_heart_rate, Some(62));
    assert_eq!(day.max_heart_rate, Some(145));

    let recovery = day.recovery.as_ref().unwrap();
    assert_eq!(recovery.score, Some(67));
    assert_eq!(recovery.resting_heart_rate, Some(52));
    assert_eq!(recovery.hrv, Some(42.3));
    assert_eq!(recovery.skin_temp_celsius, Some(33.7));
}

#[test]
fn pending_and_unscorable_cycles_are_filtered() {
    let cycles = vec![
        cycle(1, "SCORED", json!({ "strain": 5.0 })),
        cycle(2, "PENDING_SCORE", serde_json::Value::Null),
        cycle(3, "UNSCORABLE", serde_json::Value::Null),
    ];
    let stats = daily_stats(&cycles, &[]);
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].strain, Some(5.0));
}

#[test]
fn unknown_score_states_are_treated_as_not_scored() {
    let cycles = vec![cycle(1, "SOME_FUTURE_STATE", serde_json::Value::Null)];
    assert!(daily_stats(&cycles, &[]).is_empty());
}

#[test]
fn cycle_without_scored_recovery_still_emits() {
    let cycles = vec![
        cycle(1, "SCORED", json!({ "strain": 8.1 })),
        cycle(2, "SCORED", json!({ "strain": 9.2 })),
    ];
    // Recovery for cycle 2 exists but is still pending.
    let recoveries = vec![recovery(2, "PENDING_SCORE", serde_json::Value::Null)];

    let stats = daily_stats(&cycles, &recoveries);
    assert_eq!(stats.len(), 2);
    assert!(stats.iter().all(|d| d.recovery.is_none()));
}

#[test]
fn omitted_fields_stay_out_of_the_serialized_day() {
    let cycles = vec![cycle(1, "SCORED", json!({ "strain": 4.0 }))];
    let day = &daily_stats(&cycles, &[])[0];
    let value = serde_json::to_value(day).unwrap();
    assert_eq!(value["strain"], json!(4.0));
    assert!(value.get("caloriesBurned").is_none());
    assert!(value.get("recovery").is_none());
}

fn workout(state: &str, start: &str, end: &str, score: serde_json::Value) -> WhoopWorkout {
    serde_json::from_value(json!({
        "id": "6f2a7c9e-0001",
        "sport_id": 1,
        "start": start,
        "end": end,
        "score_state": state,
        "score": score,
    }))
    .unwrap()
}

#[test]
fn workout_duration_is_whole_minutes() {
    let workouts = vec![workout(
        "SCORED",
        "2025-03-01T07:00:00.000Z",
        "2025-03-01T08:30:00.000Z",
        json!({
            "strain": 12.37,
            "kilojoule": 2000.0,
            "distance_meter": 12345.6,
            "average_heart_rate": 150,
            "max_heart_rate": 182,
        }),
    )];

    let summaries = workout_summaries(&workouts);
    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert_eq!(summary.duration, 90);
    assert_eq!(summary.sport, "running");
    assert_eq!(summary.strain, Some(12.4));
    assert_eq!(summary.calories_burned, Some(478)); // 2000 kJ * 0.239
    assert_eq!(summary.distance_meters, Some(12346));
}

#[test]
fn unscored_workouts_are_dropped() {
    let workouts = vec![workout(
        "PENDING_SCORE",
        "2025-03-01T07:00:00.000Z",
        "2025-03-01T08:00:00.000Z",
        serde_json::Value::Null,
    )];
    assert!(workout_summaries(&workouts).is_empty());
}

#[test]
fn workout_with_bad_timestamps_is_skipped_not_fatal() {
    let workouts = vec![
        workout(
            "SCORED",
            "not-a-timestamp",
            "2025-03-01T08:00:00.000Z",
            json!({ "strain": 7.0 }),
        ),
        workout(
            "SCORED",
            "2025-03-01T07:00:00.000Z",
            "2025-03-01T08:00:00.000Z",
            json!({ "strain": 7.0 }),
        ),
    ];
    let summaries = workout_summaries(&workouts);
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].duration, 60);
}

#[test]
fn sport_names_are_flat_strings_with_a_fallback() {
    assert_eq!(sport_name(1), "running");
    assert_eq!(sport_name(63), "yoga");
    assert_eq!(sport_name(9999), "whoop_sport_9999");
}

// ABOUTME: Token store behavior: static fallback, in-memory save semantics
// ABOUTME: Also pins the persisted JSON shape of a token record

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

#![allow(clippy::unwrap_used)]

use serde_json::json;
use vitals_mcp_server::constants::{providers, storage_keys};
use vitals_mcp_server::tokens::{
    RedisTokenStore, StaticTokenStore, TokenRecord, TokenStore,
};

fn record() -> TokenRecord {
    TokenRecord {
        access_token: "access-1".into(),
        refresh_token: "refresh-1".into(),
        expires_at: 1_750_000_000_000,
    }
}

#[tokio::test]
async fn static_store_serves_configured_tokens() {
    let store = StaticTokenStore::new(providers::WHOOP, Some(record()));
    assert_eq!(store.provider(), providers::WHOOP);
    assert_eq!(store.load().await.unwrap().access_token, "access-1");
}

#[tokio::test]
async fn static_store_without_tokens_loads_none() {
    let store = StaticTokenStore::new(providers::WHOOP, None);
    assert!(store.load().await.is_none());
}

#[tokio::test]
async fn static_store_save_updates_the_in_memory_record() {
    let store = StaticTokenStore::new(providers::WHOOP, Some(record()));
    let rotated = TokenRecord {
        access_token: "access-2".into(),
        refresh_token: "refresh-2".into(),
        expires_at: 1_760_000_000_000,
    };
    store.save(&rotated).await;
    assert_eq!(store.load().await.unwrap(), rotated);
}

#[tokio::test]
async fn unreachable_redis_falls_back_to_static_tokens() {
    // Port 1 is never a redis server; the connection attempt fails fast.
    let store = RedisTokenStore::new(
        providers::WITHINGS,
        storage_keys::WITHINGS_TOKENS,
        "redis://127.0.0.1:1/",
        Some(record()),
    )
    .unwrap();

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.access_token, "access-1");

    // Save failures are swallowed; the call must not panic or error.
    store.save(&record()).await;
}

#[tokio::test]
async fn unreachable_redis_without_fallback_loads_none() {
    let store = RedisTokenStore::new(
        providers::WHOOP,
        storage_keys::WHOOP_TOKENS,
        "redis://127.0.0.1:1/",
        None,
    )
    .unwrap();
    assert!(store.load().await.is_none());
}

#[test]
fn malformed_redis_url_is_rejected_at_construction() {
    assert!(RedisTokenStore::new(
        providers::WHOOP,
        storage_keys::WHOOP_TOKENS,
        "not a url",
        None
    )
    .is_err());
}

#[test]
fn token_record_json_shape_is_stable() {
    let value = serde_json::to_value(record()).unwrap();
    assert_eq!(
        value,
        json!({
            "accessToken": "access-1",
            "refreshToken": "refresh-1",
            "expiresAt": 1_750_000_000_000_i64,
        })
    );
}

#[test]
fn sentinel_expiry_means_no_proactive_refresh() {
    let record = TokenRecord::without_expiry("a".into(), "r".into());
    assert_eq!(record.expires_at, 0);
    assert!(!record.expires_within(chrono::Duration::days(365)));
}

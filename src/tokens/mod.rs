// ABOUTME: Token record and the storage abstraction behind get/set of token pairs
// ABOUTME: Redis-backed durable store with silent fallback to static configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! # Token store
//!
//! A [`TokenRecord`] is exclusively owned by the store; callers never mutate
//! one in place. `load` is infallible by design: any storage failure degrades
//! silently to the statically configured tokens (or to `None`, meaning "not
//! yet authorized"). `save` failures are logged and swallowed — the new
//! in-memory record is still usable for the current call, trading perfect
//! durability for availability of the request in flight.

pub mod refresh;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Stored access/refresh token pair with expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    /// Current access token
    pub access_token: String,
    /// Refresh token for obtaining a new access token
    pub refresh_token: String,
    /// Expiry as epoch milliseconds; 0 means "unknown expiry — refresh only
    /// reactively on an authorization failure"
    pub expires_at: i64,
}

impl TokenRecord {
    /// Record with the unknown-expiry sentinel, used for statically
    /// configured tokens
    #[must_use]
    pub fn without_expiry(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: 0,
        }
    }

    /// Whether the token should be refreshed before use. The sentinel value
    /// never triggers a proactive refresh.
    #[must_use]
    pub fn expires_within(&self, window: Duration) -> bool {
        self.expires_at > 0 && self.expires_at < (Utc::now() + window).timestamp_millis()
    }
}

/// Persistence seam for one provider's token record
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Provider this store belongs to
    fn provider(&self) -> &'static str;

    /// Load the current record. `None` means "not yet authorized", never an
    /// error.
    async fn load(&self) -> Option<TokenRecord>;

    /// Persist a new record, overwriting the previous one. Must not fail the
    /// caller; persistence problems are logged.
    async fn save(&self, record: &TokenRecord);
}

/// Durable store backed by Redis, with silent fallback to static tokens.
///
/// Holds a `redis::Client` rather than a live connection so an unreachable
/// store is discovered (and degraded around) per operation instead of at
/// startup.
pub struct RedisTokenStore {
    provider: &'static str,
    key: &'static str,
    client: redis::Client,
    fallback: Option<TokenRecord>,
}

impl RedisTokenStore {
    /// Create a store for `provider` persisting under `key`.
    ///
    /// # Errors
    /// Returns the redis error if `url` does not parse; reachability is not
    /// checked here.
    pub fn new(
        provider: &'static str,
        key: &'static str,
        url: &str,
        fallback: Option<TokenRecord>,
    ) -> Result<Self, redis::RedisError> {
        Ok(Self {
            provider,
            key,
            client: redis::Client::open(url)?,
            fallback,
        })
    }

    async fn read_durable(&self) -> Result<Option<TokenRecord>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(self.key).await?;
        match raw {
            Some(json) => match serde_json::from_str(&json) {
                Ok(record) => Ok(Some(record)),
                Err(e) => {
                    warn!(
                        provider = self.provider,
                        "stored token record is corrupt, ignoring: {e}"
                    );
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    fn provider(&self) -> &'static str {
        self.provider
    }

    async fn load(&self) -> Option<TokenRecord> {
        match self.read_durable().await {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                debug!(
                    provider = self.provider,
                    "no durable token record, trying static configuration"
                );
                self.fallback.clone()
            }
            Err(e) => {
                warn!(
                    provider = self.provider,
                    "durable token store unavailable, falling back to static configuration: {e}"
                );
                self.fallback.clone()
            }
        }
    }

    async fn save(&self, record: &TokenRecord) {
        let json = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                warn!(provider = self.provider, "failed to encode token record: {e}");
                return;
            }
        };
        let result: Result<(), redis::RedisError> = async {
            let mut conn = self.client.get_multiplexed_async_connection().await?;
            conn.set(self.key, json).await
        }
        .await;
        match result {
            Ok(()) => debug!(provider = self.provider, "token record persisted"),
            Err(e) => {
                // Non-fatal: the caller keeps using the in-memory record.
                warn!(
                    provider = self.provider,
                    "failed to persist token record, continuing with in-memory tokens: {e}"
                );
            }
        }
    }
}

/// Environment-only store for deployments without durable storage.
///
/// `save` cannot persist anything; refreshed tokens live only for the
/// current process.
pub struct StaticTokenStore {
    provider: &'static str,
    current: RwLock<Option<TokenRecord>>,
}

impl StaticTokenStore {
    /// Create from statically configured tokens (if any)
    #[must_use]
    pub fn new(provider: &'static str, tokens: Option<TokenRecord>) -> Self {
        Self {
            provider,
            current: RwLock::new(tokens),
        }
    }
}

#[async_trait]
impl TokenStore for StaticTokenStore {
    fn provider(&self) -> &'static str {
        self.provider
    }

    async fn load(&self) -> Option<TokenRecord> {
        self.current.read().await.clone()
    }

    async fn save(&self, record: &TokenRecord) {
        debug!(
            provider = self.provider,
            "no durable store configured; refreshed tokens kept in memory only"
        );
        *self.current.write().await = Some(record.clone());
    }
}

/// In-memory store used by tests and as a stateless pass-through
#[derive(Default)]
pub struct MemoryTokenStore {
    provider: &'static str,
    current: RwLock<Option<TokenRecord>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    #[must_use]
    pub fn new(provider: &'static str) -> Self {
        Self {
            provider,
            current: RwLock::new(None),
        }
    }

    /// Create a store pre-seeded with a record
    #[must_use]
    pub fn with_record(provider: &'static str, record: TokenRecord) -> Self {
        Self {
            provider,
            current: RwLock::new(Some(record)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    fn provider(&self) -> &'static str {
        self.provider
    }

    async fn load(&self) -> Option<TokenRecord> {
        self.current.read().await.clone()
    }

    async fn save(&self, record: &TokenRecord) {
        *self.current.write().await = Some(record.clone());
    }
}

// ABOUTME: Auto-refresh call wrapper around token-parameterized upstream operations
// ABOUTME: Proactive refresh near expiry plus exactly one reactive refresh-and-retry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! # Auto-refresh call wrapper
//!
//! [`call_with_auto_refresh`] takes a unit of work parameterized by an access
//! token and guarantees it runs with a usable one:
//!
//! 1. Load the token record; absent means [`AppError::NotAuthorized`].
//! 2. Proactive refresh when the record expires within five minutes. A
//!    failure here degrades to `NotAuthorized` — the caller asked for data,
//!    not for a refresh, so the raw refresh error is not what they need.
//! 3. Run the operation.
//! 4. On an authorization-shaped failure, reload, refresh, persist, and
//!    retry exactly once. Failures on the retry path propagate unmodified.
//!    There is never a second retry, so a broken issuer cannot cause a
//!    refresh loop.

use super::{TokenRecord, TokenStore};
use crate::constants::PROACTIVE_REFRESH_MINUTES;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Duration;
use std::future::Future;
use tracing::{debug, info, warn};

/// Exchange a refresh token for a new token pair at the provider's token
/// endpoint. Implemented by the per-provider OAuth clients.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Provider this refresher talks to
    fn provider(&self) -> &'static str;

    /// Perform the refresh grant. Returns [`AppError::RefreshFailed`] when
    /// the token endpoint rejects the attempt.
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenRecord>;
}

/// Run `operation` with a valid access token, refreshing as needed.
pub async fn call_with_auto_refresh<T, F, Fut>(
    store: &dyn TokenStore,
    refresher: &dyn TokenRefresher,
    operation: F,
) -> AppResult<T>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let provider = refresher.provider();
    let mut record = store.load().await.ok_or(AppError::NotAuthorized { provider })?;

    if record.expires_within(Duration::minutes(PROACTIVE_REFRESH_MINUTES)) {
        debug!(provider, "access token near expiry, refreshing proactively");
        match refresher.refresh(&record.refresh_token).await {
            Ok(fresh) => {
                store.save(&fresh).await;
                record = fresh;
            }
            Err(e) => {
                warn!(provider, "proactive token refresh failed: {e}");
                return Err(AppError::NotAuthorized { provider });
            }
        }
    }

    match operation(record.access_token.clone()).await {
        Ok(value) => Ok(value),
        Err(e) if e.is_auth_failure() => {
            info!(provider, "authorization failure from upstream, refreshing and retrying once: {e}");
            let current = store.load().await.ok_or(AppError::NotAuthorized { provider })?;
            let fresh = refresher.refresh(&current.refresh_token).await?;
            store.save(&fresh).await;
            operation(fresh.access_token.clone()).await
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tokens::MemoryTokenStore;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeRefresher {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeRefresher {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl TokenRefresher for FakeRefresher {
        fn provider(&self) -> &'static str {
            crate::constants::providers::WHOOP
        }

        async fn refresh(&self, _refresh_token: &str) -> AppResult<TokenRecord> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::RefreshFailed {
                    provider: self.provider(),
                    reason: "invalid_grant".into(),
                });
            }
            Ok(TokenRecord {
                access_token: format!("fresh-{n}"),
                refresh_token: "rotated".into(),
                expires_at: (Utc::now() + Duration::hours(1)).timestamp_millis(),
            })
        }
    }

    fn far_future_record() -> TokenRecord {
        TokenRecord {
            access_token: "current".into(),
            refresh_token: "refresh".into(),
            expires_at: (Utc::now() + Duration::hours(2)).timestamp_millis(),
        }
    }

    #[tokio::test]
    async fn no_tokens_means_not_authorized() {
        let store = MemoryTokenStore::new("whoop");
        let refresher = FakeRefresher::new(false);
        let result =
            call_with_auto_refresh(&store, &refresher, |_t| async { Ok(()) }).await;
        assert!(matches!(result, Err(AppError::NotAuthorized { .. })));
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn healthy_token_runs_without_any_refresh() {
        let store = MemoryTokenStore::with_record("whoop", far_future_record());
        let refresher = FakeRefresher::new(false);
        let token = call_with_auto_refresh(&store, &refresher, |t| async move { Ok(t) })
            .await
            .unwrap();
        assert_eq!(token, "current");
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn proactive_refresh_failure_degrades_to_not_authorized() {
        let record = TokenRecord {
            access_token: "stale".into(),
            refresh_token: "refresh".into(),
            expires_at: (Utc::now() + Duration::minutes(1)).timestamp_millis(),
        };
        let store = MemoryTokenStore::with_record("whoop", record);
        let refresher = FakeRefresher::new(true);
        let result =
            call_with_auto_refresh(&store, &refresher, |t| async move { Ok(t) }).await;
        assert!(matches!(result, Err(AppError::NotAuthorized { .. })));
    }
}

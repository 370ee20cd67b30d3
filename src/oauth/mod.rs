// ABOUTME: Per-provider OAuth2 clients: authorization URLs, code exchange, token refresh
// ABOUTME: WHOOP speaks standard OAuth2; Withings wraps its token endpoint in a status envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! # OAuth2 clients
//!
//! Both providers use redirect-based authorization codes and form-encoded
//! token endpoints. The HTTP callback page that shows the exchanged tokens
//! to the user lives outside this crate; here we only build the
//! authorization URL and speak to the token endpoints.
//!
//! Withings deviates from plain OAuth2 in two ways: the token endpoint
//! requires an `action=requesttoken` form field, and every response —
//! success or failure — arrives as HTTP 200 with a `{status, body}`
//! envelope where nonzero `status` is the real error signal.

use crate::config::OAuthAppConfig;
use crate::constants::{providers, whoop, withings};
use crate::errors::{AppError, AppResult};
use crate::tokens::refresh::TokenRefresher;
use crate::tokens::TokenRecord;
use crate::utils::http_client::shared_client;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

/// Standard OAuth2 token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: i64,
}

/// Withings envelope around its token response
#[derive(Debug, Deserialize)]
struct WithingsTokenEnvelope {
    status: i64,
    body: Option<TokenResponse>,
    error: Option<String>,
}

fn expiry_millis(expires_in: i64) -> i64 {
    (Utc::now() + Duration::seconds(expires_in)).timestamp_millis()
}

/// Random opaque state parameter for the authorization redirect
fn authorization_state() -> String {
    format!("{:032x}", rand::random::<u128>())
}

fn build_authorize_url(
    auth_url: &str,
    app: &OAuthAppConfig,
    scopes: &str,
    state: &str,
) -> AppResult<String> {
    let mut url = Url::parse(auth_url)
        .map_err(|e| AppError::Internal(format!("bad authorization endpoint: {e}")))?;
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &app.client_id)
        .append_pair("redirect_uri", &app.redirect_uri)
        .append_pair("scope", scopes)
        .append_pair("state", state);
    Ok(url.into())
}

/// WHOOP OAuth2 client
pub struct WhoopAuth {
    app: OAuthAppConfig,
}

impl WhoopAuth {
    /// Create a client from the configured OAuth app
    #[must_use]
    pub const fn new(app: OAuthAppConfig) -> Self {
        Self { app }
    }

    /// Authorization URL the user must visit to grant access
    pub fn authorize_url(&self) -> AppResult<String> {
        let state = authorization_state();
        info!(provider = providers::WHOOP, state, "built authorization URL");
        build_authorize_url(whoop::AUTH_URL, &self.app, whoop::DEFAULT_SCOPES, &state)
    }

    /// Exchange an authorization code for a token pair
    pub async fn exchange_code(&self, code: &str) -> AppResult<TokenRecord> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.app.client_id.as_str()),
            ("client_secret", self.app.client_secret.as_str()),
            ("redirect_uri", self.app.redirect_uri.as_str()),
        ];
        let response = shared_client()
            .post(whoop::TOKEN_URL)
            .form(&params)
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
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::invalid_response(providers::WHOOP, e.to_string()))?;
        let refresh_token = token.refresh_token.ok_or_else(|| {
            AppError::invalid_response(providers::WHOOP, "token response missing refresh_token")
        })?;
        Ok(TokenRecord {
            access_token: token.access_token,
            refresh_token,
            expires_at: expiry_millis(token.expires_in),
        })
    }
}

#[async_trait]
impl TokenRefresher for WhoopAuth {
    fn provider(&self) -> &'static str {
        providers::WHOOP
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenRecord> {
        debug!(provider = providers::WHOOP, "refreshing access token");
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.app.client_id.as_str()),
            ("client_secret", self.app.client_secret.as_str()),
            ("scope", "offline"),
        ];
        let response = shared_client()
            .post(whoop::TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::transport(providers::WHOOP, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::RefreshFailed {
                provider: providers::WHOOP,
                reason: format!("status {status}: {body}"),
            });
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::invalid_response(providers::WHOOP, e.to_string()))?;
        Ok(TokenRecord {
            // WHOOP rotates refresh tokens; keep the old one if the response
            // omits a replacement.
            refresh_token: token
                .refresh_token
                .unwrap_or_else(|| refresh_token.to_owned()),
            access_token: token.access_token,
            expires_at: expiry_millis(token.expires_in),
        })
    }
}

/// Withings OAuth2 client
pub struct WithingsAuth {
    app: OAuthAppConfig,
}

impl WithingsAuth {
    /// Create a client from the configured OAuth app
    #[must_use]
    pub const fn new(app: OAuthAppConfig) -> Self {
        Self { app }
    }

    /// Authorization URL the user must visit to grant access
    pub fn authorize_url(&self) -> AppResult<String> {
        let state = authorization_state();
        info!(provider = providers::WITHINGS, state, "built authorization URL");
        build_authorize_url(
            withings::AUTH_URL,
            &self.app,
            withings::DEFAULT_SCOPES,
            &state,
        )
    }

    /// Exchange an authorization code for a token pair
    pub async fn exchange_code(&self, code: &str) -> AppResult<TokenRecord> {
        let params = [
            ("action", "requesttoken"),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.app.client_id.as_str()),
            ("client_secret", self.app.client_secret.as_str()),
            ("redirect_uri", self.app.redirect_uri.as_str()),
        ];
        let envelope = self.post_token_endpoint(&params).await?;
        Self::unwrap_envelope(envelope)
    }

    async fn post_token_endpoint(
        &self,
        params: &[(&str, &str)],
    ) -> AppResult<WithingsTokenEnvelope> {
        let response = shared_client()
            .post(withings::TOKEN_URL)
            .form(params)
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
        response
            .json()
            .await
            .map_err(|e| AppError::invalid_response(providers::WITHINGS, e.to_string()))
    }

    fn unwrap_envelope(envelope: WithingsTokenEnvelope) -> AppResult<TokenRecord> {
        if envelope.status != 0 {
            return Err(AppError::UpstreamRequestFailed {
                provider: providers::WITHINGS,
                status: envelope.status as u16,
                body: envelope.error.unwrap_or_else(|| "token request rejected".to_owned()),
            });
        }
        let token = envelope.body.ok_or_else(|| {
            AppError::invalid_response(providers::WITHINGS, "token envelope missing body")
        })?;
        let refresh_token = token.refresh_token.ok_or_else(|| {
            AppError::invalid_response(providers::WITHINGS, "token response missing refresh_token")
        })?;
        Ok(TokenRecord {
            access_token: token.access_token,
            refresh_token,
            expires_at: expiry_millis(token.expires_in),
        })
    }
}

#[async_trait]
impl TokenRefresher for WithingsAuth {
    fn provider(&self) -> &'static str {
        providers::WITHINGS
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenRecord> {
        debug!(provider = providers::WITHINGS, "refreshing access token");
        let params = [
            ("action", "requesttoken"),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.app.client_id.as_str()),
            ("client_secret", self.app.client_secret.as_str()),
        ];
        let envelope = self.post_token_endpoint(&params).await?;
        Self::unwrap_envelope(envelope).map_err(|e| match e {
            // On the refresh grant a rejected envelope is a refresh failure,
            // not a data-call failure.
            AppError::UpstreamRequestFailed { status, body, .. } => AppError::RefreshFailed {
                provider: providers::WITHINGS,
                reason: format!("status {status}: {body}"),
            },
            other => other,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn app() -> OAuthAppConfig {
        OAuthAppConfig {
            client_id: "cid".into(),
            client_secret: "secret".into(),
            redirect_uri: "http://localhost:8788/callback/whoop".into(),
            static_access_token: None,
            static_refresh_token: None,
        }
    }

    #[test]
    fn authorize_url_carries_the_standard_query_params() {
        let url = WhoopAuth::new(app()).authorize_url().unwrap();
        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.iter().any(|(k, v)| k == "response_type" && v == "code"));
        assert!(pairs.iter().any(|(k, v)| k == "client_id" && v == "cid"));
        assert!(pairs.iter().any(|(k, _)| k == "scope"));
        let state = pairs.iter().find(|(k, _)| k == "state").unwrap();
        assert_eq!(state.1.len(), 32);
    }

    #[test]
    fn withings_nonzero_envelope_status_is_a_hard_failure() {
        let envelope = WithingsTokenEnvelope {
            status: 401,
            body: None,
            error: Some("invalid token".into()),
        };
        let err = WithingsAuth::unwrap_envelope(envelope).unwrap_err();
        assert!(matches!(
            err,
            AppError::UpstreamRequestFailed { status: 401, .. }
        ));
    }
}

// ABOUTME: Environment-sourced server configuration, constructed once at process start
// ABOUTME: Explicit struct passed by reference everywhere; no call-time env reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! # Server configuration
//!
//! `ServerConfig::from_env()` is called exactly once in the binary. Every
//! component receives the resulting struct (or a slice of it) by reference,
//! so there is no hidden environment coupling to defeat in tests.
//!
//! A provider counts as configured when its client id is present; the client
//! secret is then required. Static access/refresh tokens are an optional
//! fallback used when no durable store is reachable.

use crate::constants::{env_vars, redirects};
use crate::errors::{AppError, AppResult};
use crate::tokens::TokenRecord;
use std::env;

/// OAuth application credentials for one provider
#[derive(Debug, Clone)]
pub struct OAuthAppConfig {
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Redirect URI registered with the provider
    pub redirect_uri: String,
    /// Statically configured access token, if any
    pub static_access_token: Option<String>,
    /// Statically configured refresh token, if any
    pub static_refresh_token: Option<String>,
}

impl OAuthAppConfig {
    /// Token record built from the static fallback tokens, with the
    /// unknown-expiry sentinel. `None` unless both tokens are present.
    #[must_use]
    pub fn static_tokens(&self) -> Option<TokenRecord> {
        match (&self.static_access_token, &self.static_refresh_token) {
            (Some(access), Some(refresh)) => {
                Some(TokenRecord::without_expiry(access.clone(), refresh.clone()))
            }
            _ => None,
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// WHOOP OAuth app, when configured
    pub whoop: Option<OAuthAppConfig>,
    /// Withings OAuth app, when configured
    pub withings: Option<OAuthAppConfig>,
    /// Redis URL for the durable token store
    pub redis_url: Option<String>,
    /// Shared secret required on tools/call requests
    pub shared_secret: Option<String>,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`AppError::ConfigurationMissing`] when a provider has a
    /// client id but no client secret.
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            whoop: Self::load_provider(
                env_vars::WHOOP_CLIENT_ID,
                env_vars::WHOOP_CLIENT_SECRET,
                env_vars::WHOOP_REDIRECT_URI,
                redirects::WHOOP,
                env_vars::WHOOP_ACCESS_TOKEN,
                env_vars::WHOOP_REFRESH_TOKEN,
            )?,
            withings: Self::load_provider(
                env_vars::WITHINGS_CLIENT_ID,
                env_vars::WITHINGS_CLIENT_SECRET,
                env_vars::WITHINGS_REDIRECT_URI,
                redirects::WITHINGS,
                env_vars::WITHINGS_ACCESS_TOKEN,
                env_vars::WITHINGS_REFRESH_TOKEN,
            )?,
            redis_url: non_empty(env_vars::REDIS_URL),
            shared_secret: non_empty(env_vars::MCP_SHARED_SECRET),
        })
    }

    fn load_provider(
        id_var: &'static str,
        secret_var: &'static str,
        redirect_var: &'static str,
        default_redirect: &str,
        access_var: &'static str,
        refresh_var: &'static str,
    ) -> AppResult<Option<OAuthAppConfig>> {
        let Some(client_id) = non_empty(id_var) else {
            return Ok(None);
        };
        let client_secret = non_empty(secret_var)
            .ok_or(AppError::ConfigurationMissing { key: secret_var })?;
        Ok(Some(OAuthAppConfig {
            client_id,
            client_secret,
            redirect_uri: non_empty(redirect_var).unwrap_or_else(|| default_redirect.to_owned()),
            static_access_token: non_empty(access_var),
            static_refresh_token: non_empty(refresh_var),
        }))
    }

    /// One-line startup summary; never includes secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "providers: whoop={} withings={}, durable store={}, shared secret={}",
            if self.whoop.is_some() { "on" } else { "off" },
            if self.withings.is_some() { "on" } else { "off" },
            if self.redis_url.is_some() { "redis" } else { "static" },
            if self.shared_secret.is_some() { "required" } else { "off" },
        )
    }
}

/// Read an env var, treating empty strings as absent
fn non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

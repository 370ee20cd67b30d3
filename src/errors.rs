// ABOUTME: Typed error taxonomy for token lifecycle, upstream calls, and configuration
// ABOUTME: Carries the auth-failure predicate that drives the single reactive retry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! # Error handling
//!
//! One error enum covers the whole crate. The retry decision in the
//! auto-refresh wrapper is a type check on [`AppError::is_auth_failure`],
//! never a substring search over error messages.

use crate::jsonrpc::error_codes;
use thiserror::Error;

/// Result alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Unified application error
#[derive(Debug, Error)]
pub enum AppError {
    /// No usable token pair exists for the provider. Terminal: the user must
    /// run the authorization flow (`connect_provider`) first.
    #[error("not authorized with {provider}: run connect_provider and complete the OAuth flow")]
    NotAuthorized {
        /// Provider that has no stored or configured tokens
        provider: &'static str,
    },

    /// The upstream API answered with a non-success status. Carries the
    /// response body as diagnostic text.
    #[error("{provider} request failed with status {status}: {body}")]
    UpstreamRequestFailed {
        /// Provider that produced the response
        provider: &'static str,
        /// HTTP status (or Withings envelope status) of the failure
        status: u16,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// The token endpoint rejected a refresh attempt
    #[error("{provider} token refresh rejected: {reason}")]
    RefreshFailed {
        /// Provider whose token endpoint rejected the refresh
        provider: &'static str,
        /// Upstream detail, usually the response body
        reason: String,
    },

    /// A required credential is absent from the environment
    #[error("missing configuration: {key}")]
    ConfigurationMissing {
        /// Environment variable that must be set
        key: &'static str,
    },

    /// The request never reached the upstream (connect/timeout/TLS)
    #[error("{provider} transport error: {source}")]
    Transport {
        /// Provider the request was addressed to
        provider: &'static str,
        /// Underlying reqwest error
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered 2xx but the payload did not parse
    #[error("{provider} returned an unparseable response: {reason}")]
    InvalidResponse {
        /// Provider that produced the payload
        provider: &'static str,
        /// Parse failure detail
        reason: String,
    },

    /// Tool arguments failed validation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Anything else (serialization of our own output, mostly)
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this failure looks like an authorization problem worth one
    /// reactive refresh-and-retry.
    ///
    /// 401 from either provider is authoritative. WHOOP additionally
    /// surfaces misconfigured or revoked tokens as 404 on some endpoints,
    /// so 404 counts as auth-shaped for WHOOP only.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::UpstreamRequestFailed {
                provider, status, ..
            } => *status == 401 || (*provider == crate::constants::providers::WHOOP && *status == 404),
            _ => false,
        }
    }

    /// JSON-RPC error code for the protocol-level error envelope
    #[must_use]
    pub const fn json_rpc_code(&self) -> i32 {
        match self {
            Self::NotAuthorized { .. } => error_codes::NOT_AUTHORIZED,
            Self::ConfigurationMissing { .. } => error_codes::CONFIG_MISSING,
            Self::RefreshFailed { .. } => error_codes::REFRESH_FAILED,
            Self::UpstreamRequestFailed { .. } => error_codes::UPSTREAM_FAILED,
            Self::Transport { .. } | Self::InvalidResponse { .. } => error_codes::UPSTREAM_FAILED,
            Self::InvalidInput(_) => error_codes::INVALID_PARAMS,
            Self::Internal(_) => error_codes::INTERNAL_ERROR,
        }
    }

    /// Transport-level failure talking to a provider
    #[must_use]
    pub const fn transport(provider: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { provider, source }
    }

    /// 2xx response with a payload that did not deserialize
    pub fn invalid_response(provider: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::providers;

    #[test]
    fn auth_predicate_matches_401_for_any_provider() {
        let err = AppError::UpstreamRequestFailed {
            provider: providers::WITHINGS,
            status: 401,
            body: String::new(),
        };
        assert!(err.is_auth_failure());
    }

    #[test]
    fn whoop_404_is_auth_shaped_but_withings_404_is_not() {
        let whoop = AppError::UpstreamRequestFailed {
            provider: providers::WHOOP,
            status: 404,
            body: String::new(),
        };
        let withings = AppError::UpstreamRequestFailed {
            provider: providers::WITHINGS,
            status: 404,
            body: String::new(),
        };
        assert!(whoop.is_auth_failure());
        assert!(!withings.is_auth_failure());
    }

    #[test]
    fn refresh_failure_is_not_auth_shaped() {
        let err = AppError::RefreshFailed {
            provider: providers::WHOOP,
            reason: "invalid_grant".into(),
        };
        assert!(!err.is_auth_failure());
    }
}

// ABOUTME: Application constants for provider endpoints, env var names, and defaults
// ABOUTME: Central place for every fixed string the server depends on
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! Application-wide constants.

/// Provider identifiers used in logs, storage keys, and tool arguments
pub mod providers {
    /// WHOOP fitness/recovery API
    pub const WHOOP: &str = "whoop";
    /// Withings body-metrics API
    pub const WITHINGS: &str = "withings";
}

/// WHOOP API endpoints
pub mod whoop {
    /// OAuth authorization endpoint (redirect-based)
    pub const AUTH_URL: &str = "https://api.prod.whoop.com/oauth/oauth2/auth";
    /// OAuth token endpoint (form-encoded POST)
    pub const TOKEN_URL: &str = "https://api.prod.whoop.com/oauth/oauth2/token";
    /// Base URL for data endpoints
    pub const API_BASE_URL: &str = "https://api.prod.whoop.com/developer/v1";
    /// Scopes requested during authorization
    pub const DEFAULT_SCOPES: &str = "read:cycles read:recovery read:workout read:profile offline";
    /// Collection page size; only the first page is fetched (known limitation)
    pub const PAGE_LIMIT: u32 = 25;
}

/// Withings API endpoints
pub mod withings {
    /// OAuth authorization endpoint (redirect-based)
    pub const AUTH_URL: &str = "https://account.withings.com/oauth2_user/authorize2";
    /// OAuth v2 token endpoint; requires `action=requesttoken` in the form body
    pub const TOKEN_URL: &str = "https://wbsapi.withings.net/v2/oauth2";
    /// Measurement endpoint
    pub const MEASURE_URL: &str = "https://wbsapi.withings.net/measure";
    /// Scopes requested during authorization
    pub const DEFAULT_SCOPES: &str = "user.metrics";
    /// Measure types requested from getmeas: weight, fat ratio, muscle mass,
    /// hydration, bone mass
    pub const MEASURE_TYPES: &str = "1,6,76,77,88";
}

/// Environment variable names read by `ServerConfig::from_env`
pub mod env_vars {
    /// WHOOP OAuth client id
    pub const WHOOP_CLIENT_ID: &str = "WHOOP_CLIENT_ID";
    /// WHOOP OAuth client secret
    pub const WHOOP_CLIENT_SECRET: &str = "WHOOP_CLIENT_SECRET";
    /// WHOOP redirect URI override
    pub const WHOOP_REDIRECT_URI: &str = "WHOOP_REDIRECT_URI";
    /// Static WHOOP access token fallback
    pub const WHOOP_ACCESS_TOKEN: &str = "WHOOP_ACCESS_TOKEN";
    /// Static WHOOP refresh token fallback
    pub const WHOOP_REFRESH_TOKEN: &str = "WHOOP_REFRESH_TOKEN";
    /// Withings OAuth client id
    pub const WITHINGS_CLIENT_ID: &str = "WITHINGS_CLIENT_ID";
    /// Withings OAuth client secret
    pub const WITHINGS_CLIENT_SECRET: &str = "WITHINGS_CLIENT_SECRET";
    /// Withings redirect URI override
    pub const WITHINGS_REDIRECT_URI: &str = "WITHINGS_REDIRECT_URI";
    /// Static Withings access token fallback
    pub const WITHINGS_ACCESS_TOKEN: &str = "WITHINGS_ACCESS_TOKEN";
    /// Static Withings refresh token fallback
    pub const WITHINGS_REFRESH_TOKEN: &str = "WITHINGS_REFRESH_TOKEN";
    /// Redis connection URL for the durable token store
    pub const REDIS_URL: &str = "REDIS_URL";
    /// Shared secret required on tools/call requests when set
    pub const MCP_SHARED_SECRET: &str = "MCP_SHARED_SECRET";
    /// Log output format (pretty, compact, json)
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
}

/// Default redirect URIs used when no override is configured
pub mod redirects {
    /// Default WHOOP callback
    pub const WHOOP: &str = "http://localhost:8788/callback/whoop";
    /// Default Withings callback
    pub const WITHINGS: &str = "http://localhost:8788/callback/withings";
}

/// Token storage keys, one fixed key per provider
pub mod storage_keys {
    /// WHOOP token record
    pub const WHOOP_TOKENS: &str = "vitals:tokens:whoop";
    /// Withings token record
    pub const WITHINGS_TOKENS: &str = "vitals:tokens:withings";
}

/// MCP tool names exposed by the dispatcher
pub mod tools {
    /// Merged cycle + recovery daily view
    pub const GET_DAILY_STATS: &str = "get_daily_stats";
    /// Scored workout summaries
    pub const GET_WORKOUTS: &str = "get_workouts";
    /// Withings weight measurements
    pub const GET_WEIGHT: &str = "get_weight";
    /// Per-provider configured/connected report
    pub const GET_CONNECTION_STATUS: &str = "get_connection_status";
    /// Authorization URL for a provider
    pub const CONNECT_PROVIDER: &str = "connect_provider";
}

/// Default number of days fetched when a tool call supplies no range
pub const DEFAULT_RANGE_DAYS: i64 = 7;

/// Minutes before expiry at which a token is refreshed proactively
pub const PROACTIVE_REFRESH_MINUTES: i64 = 5;

/// MCP protocol version implemented by this server
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name reported during initialize
pub const SERVER_NAME: &str = "vitals-mcp-server";

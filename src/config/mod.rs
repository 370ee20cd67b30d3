// ABOUTME: Configuration module root
// ABOUTME: Environment-sourced server configuration built once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! Configuration management.

/// Environment-based configuration loading
pub mod environment;

pub use environment::{OAuthAppConfig, ServerConfig};

// ABOUTME: Crate root for the vitals MCP server library
// ABOUTME: OAuth2 token lifecycle, provider clients, normalizers, MCP protocol

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! # Vitals MCP server
//!
//! An MCP server exposing normalized health data from WHOOP (strain,
//! recovery, workouts) and Withings (weight, body composition) as tool
//! calls over stdio.
//!
//! The layering, bottom up:
//!
//! - [`jsonrpc`] — JSON-RPC 2.0 wire types
//! - [`tokens`] — token records, stores, and the auto-refresh wrapper
//! - [`oauth`] — per-provider authorization and token-endpoint clients
//! - [`providers`] — API clients and pure normalizers
//! - [`mcp`] — tool schemas, dispatch, and the stdio server

/// Configuration loaded once at startup
pub mod config;
/// Provider endpoints, env var names, and protocol constants
pub mod constants;
/// Application error taxonomy
pub mod errors;
/// JSON-RPC 2.0 types
pub mod jsonrpc;
/// Tracing setup
pub mod logging;
/// MCP protocol layer
pub mod mcp;
/// Normalized output models
pub mod models;
/// OAuth2 clients
pub mod oauth;
/// Provider API clients and normalizers
pub mod providers;
/// Token records, stores, and auto-refresh
pub mod tokens;
/// Shared utilities
pub mod utils;

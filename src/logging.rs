// ABOUTME: Tracing subscriber setup writing to stderr
// ABOUTME: Stdout carries the protocol, so logs must never land there

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! Logging initialization.
//!
//! Filter comes from `RUST_LOG` (default `info`), format from `LOG_FORMAT`:
//! `pretty`, `json`, or the compact default.

use crate::constants::env_vars;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let format = std::env::var(env_vars::LOG_FORMAT).unwrap_or_default();

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let result = match format.as_str() {
        "json" => builder.json().try_init(),
        "pretty" => builder.pretty().try_init(),
        _ => builder.compact().try_init(),
    };
    // Err here means a subscriber is already installed, e.g. by a test
    // harness; keep the existing one.
    drop(result);
}

// ABOUTME: Lazily built process-wide reqwest client with sane timeouts
// ABOUTME: One connection pool shared by every provider and OAuth call

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! Shared HTTP client.

use std::sync::OnceLock;
use std::time::Duration;

static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// The process-wide HTTP client. Built on first use; every caller shares one
/// connection pool.
pub fn shared_client() -> &'static reqwest::Client {
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            // Builder failure here means TLS backend initialization failed;
            // nothing in this process can make HTTP calls anyway.
            .unwrap_or_default()
    })
}

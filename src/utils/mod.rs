// ABOUTME: Small shared utilities
// ABOUTME: Currently just the process-wide HTTP client

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! Shared utilities.

/// Process-wide HTTP client
pub mod http_client;

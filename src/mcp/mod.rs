// ABOUTME: MCP protocol layer: schema, tool dispatch, and the stdio server
// ABOUTME: Everything above the JSON-RPC foundation and below the binary

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! Model Context Protocol implementation.

/// Wire types and tool schemas
pub mod schema;
/// Stdio transport and method routing
pub mod server;
/// Tool dispatch and provider services
pub mod tool_handlers;

pub use server::McpServer;
pub use tool_handlers::{ToolContext, WhoopService, WithingsService};

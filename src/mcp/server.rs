// ABOUTME: MCP server core: stdio transport and JSON-RPC method routing
// ABOUTME: Protocol traffic on stdout, logs on stderr, one request per line

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! # MCP server
//!
//! Line-delimited JSON-RPC over stdio. Each line is one request; responses
//! go to stdout, so logging must never write there. Notifications produce no
//! response. Requests are handled sequentially in arrival order — MCP
//! clients send one request at a time over stdio, so there is nothing to
//! parallelize at this layer.

use crate::jsonrpc::{error_codes, JsonRpcRequest, JsonRpcResponse};
use crate::mcp::schema::{get_tools, InitializeResponse};
use crate::mcp::tool_handlers::ToolContext;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

/// MCP server over stdio
pub struct McpServer {
    context: ToolContext,
    shared_secret: Option<String>,
}

impl McpServer {
    /// Create a server from the assembled tool context
    #[must_use]
    pub fn new(context: ToolContext, shared_secret: Option<String>) -> Self {
        Self {
            context,
            shared_secret,
        }
    }

    /// Read requests from stdin until EOF, answering on stdout.
    ///
    /// # Errors
    /// Returns an error only when stdio itself fails; malformed requests are
    /// answered with JSON-RPC errors and the loop continues.
    pub async fn run_stdio(&self) -> std::io::Result<()> {
        info!("listening on stdio");
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let mut lines = stdin.lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let response = match serde_json::from_str::<JsonRpcRequest>(line) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => {
                    warn!("unparseable request line: {e}");
                    Some(JsonRpcResponse::error(
                        None,
                        error_codes::PARSE_ERROR,
                        format!("invalid JSON-RPC request: {e}"),
                    ))
                }
            };
            if let Some(response) = response {
                let mut payload = serde_json::to_vec(&response)
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
                payload.push(b'\n');
                stdout.write_all(&payload).await?;
                stdout.flush().await?;
            }
        }
        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one request. `None` for notifications.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!(method = request.method, "ignoring notification");
            return None;
        }
        let id = request.id.clone();
        let response = match request.method.as_str() {
            "initialize" => self.initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => match serde_json::to_value(get_tools()) {
                Ok(tools) => JsonRpcResponse::success(id, json!({ "tools": tools })),
                Err(e) => JsonRpcResponse::error(
                    id,
                    error_codes::INTERNAL_ERROR,
                    format!("failed to encode tool list: {e}"),
                ),
            },
            "tools/call" => self.tools_call(&request).await,
            other => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("method not found: {other}"),
            ),
        };
        Some(response)
    }

    fn initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        info!("client initializing");
        match serde_json::to_value(InitializeResponse::current()) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => JsonRpcResponse::error(
                id,
                error_codes::INTERNAL_ERROR,
                format!("failed to encode initialize result: {e}"),
            ),
        }
    }

    async fn tools_call(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();
        if let Some(expected) = &self.shared_secret {
            if request.auth_token.as_deref() != Some(expected.as_str()) {
                warn!("tools/call rejected: shared secret missing or wrong");
                return JsonRpcResponse::error(
                    id,
                    error_codes::UNAUTHORIZED_REQUEST,
                    "authentication required",
                );
            }
        }
        let Some(params) = &request.params else {
            return JsonRpcResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                "tools/call requires params",
            );
        };
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return JsonRpcResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                "tools/call params require a tool name",
            );
        };
        let arguments = params.get("arguments");

        match self.context.handle_tool_call(name, arguments).await {
            Ok(tool_response) => match serde_json::to_value(&tool_response) {
                Ok(result) => JsonRpcResponse::success(id, result),
                Err(e) => JsonRpcResponse::error(
                    id,
                    error_codes::INTERNAL_ERROR,
                    format!("failed to encode tool response: {e}"),
                ),
            },
            Err(e) => {
                warn!(tool = name, "tool call failed: {e}");
                JsonRpcResponse::error(id, e.json_rpc_code(), e.to_string())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn bare_server(secret: Option<&str>) -> McpServer {
        McpServer::new(
            ToolContext {
                whoop: None,
                withings: None,
            },
            secret.map(str::to_owned),
        )
    }

    fn request(method: &str, params: Option<Value>, auth: Option<&str>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_owned(),
            method: method.to_owned(),
            params,
            id: Some(json!(1)),
            auth_token: auth.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn initialize_reports_protocol_and_server_info() {
        let server = bare_server(None);
        let response = server
            .handle_request(request("initialize", None, None))
            .await
            .unwrap();
        let result = response.result.unwrap();
        assert_eq!(
            result["protocolVersion"],
            json!(crate::constants::MCP_PROTOCOL_VERSION)
        );
        assert_eq!(result["serverInfo"]["name"], json!(crate::constants::SERVER_NAME));
    }

    #[tokio::test]
    async fn notifications_get_no_response() {
        let server = bare_server(None);
        let mut req = request("notifications/initialized", None, None);
        req.id = None;
        assert!(server.handle_request(req).await.is_none());
    }

    #[tokio::test]
    async fn shared_secret_gates_tool_calls_only() {
        let server = bare_server(Some("s3cret"));
        let params = json!({ "name": "get_connection_status" });

        // tools/list stays open
        let open = server
            .handle_request(request("tools/list", None, None))
            .await
            .unwrap();
        assert!(open.is_success());

        let denied = server
            .handle_request(request("tools/call", Some(params.clone()), None))
            .await
            .unwrap();
        assert_eq!(
            denied.error.unwrap().code,
            error_codes::UNAUTHORIZED_REQUEST
        );

        let allowed = server
            .handle_request(request("tools/call", Some(params), Some("s3cret")))
            .await
            .unwrap();
        assert!(allowed.is_success());
    }

    #[tokio::test]
    async fn unknown_method_maps_to_method_not_found() {
        let server = bare_server(None);
        let response = server
            .handle_request(request("resources/list", None, None))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
    }
}

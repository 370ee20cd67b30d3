// ABOUTME: MCP wire types: tool schemas, content blocks, initialize payloads
// ABOUTME: Declares the five tools this server exposes and their input schemas

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! MCP protocol schema definitions.

use crate::constants::{tools, MCP_PROTOCOL_VERSION, SERVER_NAME};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A tool advertised through `tools/list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name clients pass to `tools/call`
    pub name: String,
    /// Human-readable description shown to the model
    pub description: String,
    /// JSON Schema for the tool arguments
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonSchema,
}

/// Subset of JSON Schema used for tool inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSchema {
    /// Always "object" for tool inputs
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Named properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, PropertySchema>>,
    /// Required property names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

/// A single property in a tool input schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    /// JSON type name
    #[serde(rename = "type")]
    pub property_type: String,
    /// What the property means
    pub description: String,
}

/// One content block in a tool response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Content type, currently always "text"
    #[serde(rename = "type")]
    pub content_type: String,
    /// The text payload
    pub text: String,
}

impl Content {
    /// Text content block
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: "text".to_owned(),
            text: text.into(),
        }
    }
}

/// Result payload of a `tools/call`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Content blocks
    pub content: Vec<Content>,
    /// Set when the tool itself failed
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolResponse {
    /// Successful response with one text block
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: None,
        }
    }
}

/// Result payload of `initialize`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResponse {
    /// Protocol version this server speaks
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Capability map
    pub capabilities: serde_json::Value,
    /// Server identity
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

/// Server name and version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Crate version
    pub version: String,
}

impl InitializeResponse {
    /// The fixed initialize payload for this server
    #[must_use]
    pub fn current() -> Self {
        Self {
            protocol_version: MCP_PROTOCOL_VERSION.to_owned(),
            capabilities: serde_json::json!({ "tools": {} }),
            server_info: ServerInfo {
                name: SERVER_NAME.to_owned(),
                version: env!("CARGO_PKG_VERSION").to_owned(),
            },
        }
    }
}

fn date_window_properties() -> HashMap<String, PropertySchema> {
    HashMap::from([
        (
            "startDate".to_owned(),
            PropertySchema {
                property_type: "string".to_owned(),
                description: "Start of the window, YYYY-MM-DD or RFC 3339".to_owned(),
            },
        ),
        (
            "endDate".to_owned(),
            PropertySchema {
                property_type: "string".to_owned(),
                description: "End of the window, YYYY-MM-DD or RFC 3339".to_owned(),
            },
        ),
        (
            "days".to_owned(),
            PropertySchema {
                property_type: "number".to_owned(),
                description: "Trailing window in days, ignored when explicit dates are given"
                    .to_owned(),
            },
        ),
    ])
}

fn date_window_schema() -> JsonSchema {
    JsonSchema {
        schema_type: "object".to_owned(),
        properties: Some(date_window_properties()),
        required: None,
    }
}

/// All tools this server advertises
#[must_use]
pub fn get_tools() -> Vec<ToolSchema> {
    vec![
        ToolSchema {
            name: tools::GET_DAILY_STATS.to_owned(),
            description:
                "Daily strain, calories, heart rate, and recovery from WHOOP for a date window"
                    .to_owned(),
            input_schema: date_window_schema(),
        },
        ToolSchema {
            name: tools::GET_WORKOUTS.to_owned(),
            description: "Scored WHOOP workouts with sport, duration, and effort figures"
                .to_owned(),
            input_schema: date_window_schema(),
        },
        ToolSchema {
            name: tools::GET_WEIGHT.to_owned(),
            description: "Weight and body-composition readings from Withings for a date window"
                .to_owned(),
            input_schema: date_window_schema(),
        },
        ToolSchema {
            name: tools::GET_CONNECTION_STATUS.to_owned(),
            description: "Which providers are configured and hold usable tokens".to_owned(),
            input_schema: JsonSchema {
                schema_type: "object".to_owned(),
                properties: None,
                required: None,
            },
        },
        ToolSchema {
            name: tools::CONNECT_PROVIDER.to_owned(),
            description: "Authorization URL to connect a provider account".to_owned(),
            input_schema: JsonSchema {
                schema_type: "object".to_owned(),
                properties: Some(HashMap::from([(
                    "provider".to_owned(),
                    PropertySchema {
                        property_type: "string".to_owned(),
                        description: "Provider name: whoop or withings".to_owned(),
                    },
                )])),
                required: Some(vec!["provider".to_owned()]),
            },
        },
    ]
}

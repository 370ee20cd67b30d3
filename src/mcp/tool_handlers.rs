// ABOUTME: Tool dispatch: argument parsing, auto-refreshed provider calls, JSON responses
// ABOUTME: Each tool maps to one provider fetch-and-normalize pipeline

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! # Tool handlers
//!
//! [`ToolContext`] owns the per-provider services (client, OAuth client,
//! token store) and dispatches `tools/call` requests. Every upstream data
//! call runs through the auto-refresh wrapper; normalization happens on the
//! raw records before the result is serialized as a pretty-printed JSON text
//! block.

use crate::constants::{env_vars, providers, tools};
use crate::errors::{AppError, AppResult};
use crate::mcp::schema::ToolResponse;
use crate::models::ConnectionStatus;
use crate::oauth::{WhoopAuth, WithingsAuth};
use crate::providers::whoop::{self, WhoopClient};
use crate::providers::withings::{self, WithingsClient};
use crate::providers::DateRange;
use crate::tokens::refresh::call_with_auto_refresh;
use crate::tokens::TokenStore;
use serde_json::Value;
use tracing::debug;

/// Everything needed to serve WHOOP tools
pub struct WhoopService {
    /// API client
    pub client: WhoopClient,
    /// OAuth client, also the token refresher
    pub auth: WhoopAuth,
    /// Token store for this provider
    pub store: Box<dyn TokenStore>,
}

/// Everything needed to serve Withings tools
pub struct WithingsService {
    /// API client
    pub client: WithingsClient,
    /// OAuth client, also the token refresher
    pub auth: WithingsAuth,
    /// Token store for this provider
    pub store: Box<dyn TokenStore>,
}

/// Shared state behind all tool calls
pub struct ToolContext {
    /// WHOOP service, absent when the provider is not configured
    pub whoop: Option<WhoopService>,
    /// Withings service, absent when the provider is not configured
    pub withings: Option<WithingsService>,
}

impl ToolContext {
    /// Dispatch one tool call
    pub async fn handle_tool_call(
        &self,
        name: &str,
        arguments: Option<&Value>,
    ) -> AppResult<ToolResponse> {
        debug!(tool = name, "dispatching tool call");
        match name {
            tools::GET_DAILY_STATS => self.get_daily_stats(arguments).await,
            tools::GET_WORKOUTS => self.get_workouts(arguments).await,
            tools::GET_WEIGHT => self.get_weight(arguments).await,
            tools::GET_CONNECTION_STATUS => self.get_connection_status().await,
            tools::CONNECT_PROVIDER => self.connect_provider(arguments),
            other => Err(AppError::InvalidInput(format!("unknown tool: {other}"))),
        }
    }

    fn whoop(&self) -> AppResult<&WhoopService> {
        self.whoop.as_ref().ok_or(AppError::ConfigurationMissing {
            key: env_vars::WHOOP_CLIENT_ID,
        })
    }

    fn withings(&self) -> AppResult<&WithingsService> {
        self.withings
            .as_ref()
            .ok_or(AppError::ConfigurationMissing {
                key: env_vars::WITHINGS_CLIENT_ID,
            })
    }

    async fn get_daily_stats(&self, arguments: Option<&Value>) -> AppResult<ToolResponse> {
        let svc = self.whoop()?;
        let range = resolve_range(arguments)?;
        let (cycles, recoveries) =
            call_with_auto_refresh(svc.store.as_ref(), &svc.auth, |token| async move {
                tokio::try_join!(
                    svc.client.get_cycles(&token, range),
                    svc.client.get_recoveries(&token, range)
                )
            })
            .await?;
        json_response(&whoop::daily_stats(&cycles, &recoveries))
    }

    async fn get_workouts(&self, arguments: Option<&Value>) -> AppResult<ToolResponse> {
        let svc = self.whoop()?;
        let range = resolve_range(arguments)?;
        let workouts =
            call_with_auto_refresh(svc.store.as_ref(), &svc.auth, |token| async move {
                svc.client.get_workouts(&token, range).await
            })
            .await?;
        json_response(&whoop::workout_summaries(&workouts))
    }

    async fn get_weight(&self, arguments: Option<&Value>) -> AppResult<ToolResponse> {
        let svc = self.withings()?;
        let range = resolve_range(arguments)?;
        let start = range.start.map(|t| t.timestamp());
        let end = range.end.map(|t| t.timestamp());
        let groups =
            call_with_auto_refresh(svc.store.as_ref(), &svc.auth, |token| async move {
                svc.client.get_measure_groups(&token, start, end).await
            })
            .await?;
        json_response(&withings::weight_points(&groups))
    }

    async fn get_connection_status(&self) -> AppResult<ToolResponse> {
        let mut statuses = Vec::with_capacity(2);
        statuses.push(match &self.whoop {
            Some(svc) => ConnectionStatus {
                provider: providers::WHOOP.to_owned(),
                configured: true,
                connected: svc.store.load().await.is_some(),
            },
            None => ConnectionStatus::unconfigured(providers::WHOOP),
        });
        statuses.push(match &self.withings {
            Some(svc) => ConnectionStatus {
                provider: providers::WITHINGS.to_owned(),
                configured: true,
                connected: svc.store.load().await.is_some(),
            },
            None => ConnectionStatus::unconfigured(providers::WITHINGS),
        });
        json_response(&statuses)
    }

    fn connect_provider(&self, arguments: Option<&Value>) -> AppResult<ToolResponse> {
        let provider = arg_str(arguments, "provider")
            .ok_or_else(|| AppError::InvalidInput("provider argument is required".to_owned()))?;
        let url = match provider {
            providers::WHOOP => self.whoop()?.auth.authorize_url()?,
            providers::WITHINGS => self.withings()?.auth.authorize_url()?,
            other => {
                return Err(AppError::InvalidInput(format!(
                    "unknown provider: {other}, expected whoop or withings"
                )))
            }
        };
        Ok(ToolResponse::text(format!(
            "Open this URL in a browser to authorize {provider}:\n{url}"
        )))
    }
}

fn resolve_range(arguments: Option<&Value>) -> AppResult<DateRange> {
    DateRange::resolve(
        arg_str(arguments, "startDate"),
        arg_str(arguments, "endDate"),
        arg_i64(arguments, "days"),
    )
}

fn arg_str<'a>(arguments: Option<&'a Value>, key: &str) -> Option<&'a str> {
    arguments?.get(key)?.as_str()
}

fn arg_i64(arguments: Option<&Value>, key: &str) -> Option<i64> {
    let value = arguments?.get(key)?;
    // Accept both 7 and 7.0; clients disagree on number encoding.
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

fn json_response<T: serde::Serialize>(value: &T) -> AppResult<ToolResponse> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Internal(format!("response serialization failed: {e}")))?;
    Ok(ToolResponse::text(text))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn days_argument_accepts_integers_and_floats() {
        let args = json!({ "days": 7 });
        assert_eq!(arg_i64(Some(&args), "days"), Some(7));
        let args = json!({ "days": 7.0 });
        assert_eq!(arg_i64(Some(&args), "days"), Some(7));
        assert_eq!(arg_i64(None, "days"), None);
    }

    #[tokio::test]
    async fn unconfigured_provider_is_a_configuration_error() {
        let context = ToolContext {
            whoop: None,
            withings: None,
        };
        let err = context
            .handle_tool_call(tools::GET_DAILY_STATS, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigurationMissing { .. }));
    }

    #[tokio::test]
    async fn unknown_tool_is_rejected() {
        let context = ToolContext {
            whoop: None,
            withings: None,
        };
        let err = context.handle_tool_call("no_such_tool", None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}

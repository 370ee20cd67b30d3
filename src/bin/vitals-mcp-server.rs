// ABOUTME: Binary entry point: config load, service wiring, stdio serve loop
// ABOUTME: Also offers a one-shot flag that prints provider authorization URLs

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals MCP contributors

//! MCP server binary.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use vitals_mcp_server::config::{OAuthAppConfig, ServerConfig};
use vitals_mcp_server::constants::{providers, storage_keys};
use vitals_mcp_server::logging;
use vitals_mcp_server::mcp::{McpServer, ToolContext, WhoopService, WithingsService};
use vitals_mcp_server::oauth::{WhoopAuth, WithingsAuth};
use vitals_mcp_server::providers::whoop::WhoopClient;
use vitals_mcp_server::providers::withings::WithingsClient;
use vitals_mcp_server::tokens::{RedisTokenStore, StaticTokenStore, TokenStore};

#[derive(Parser)]
#[command(name = "vitals-mcp-server")]
#[command(about = "MCP server for WHOOP and Withings health data")]
#[command(version)]
struct Args {
    /// Print authorization URLs for the configured providers and exit
    #[arg(long)]
    print_auth_urls: bool,
}

fn build_store(
    provider: &'static str,
    key: &'static str,
    redis_url: Option<&str>,
    app: &OAuthAppConfig,
) -> Box<dyn TokenStore> {
    let fallback = app.static_tokens();
    if let Some(url) = redis_url {
        match RedisTokenStore::new(provider, key, url, fallback.clone()) {
            Ok(store) => return Box::new(store),
            Err(e) => {
                warn!(provider, "invalid REDIS_URL, using static tokens only: {e}");
            }
        }
    }
    Box::new(StaticTokenStore::new(provider, fallback))
}

fn print_auth_urls(config: &ServerConfig) -> Result<()> {
    if let Some(app) = &config.whoop {
        println!("whoop: {}", WhoopAuth::new(app.clone()).authorize_url()?);
    }
    if let Some(app) = &config.withings {
        println!(
            "withings: {}",
            WithingsAuth::new(app.clone()).authorize_url()?
        );
    }
    if config.whoop.is_none() && config.withings.is_none() {
        println!("no providers configured");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init();

    let config = ServerConfig::from_env().context("failed to load configuration")?;
    info!("{}", config.summary());

    if args.print_auth_urls {
        return print_auth_urls(&config);
    }

    let whoop = config.whoop.as_ref().map(|app| WhoopService {
        client: WhoopClient::new(),
        auth: WhoopAuth::new(app.clone()),
        store: build_store(
            providers::WHOOP,
            storage_keys::WHOOP_TOKENS,
            config.redis_url.as_deref(),
            app,
        ),
    });
    let withings = config.withings.as_ref().map(|app| WithingsService {
        client: WithingsClient::new(),
        auth: WithingsAuth::new(app.clone()),
        store: build_store(
            providers::WITHINGS,
            storage_keys::WITHINGS_TOKENS,
            config.redis_url.as_deref(),
            app,
        ),
    });

    let server = McpServer::new(
        ToolContext { whoop, withings },
        config.shared_secret.clone(),
    );
    server.run_stdio().await.context("stdio transport failed")?;
    Ok(())
}

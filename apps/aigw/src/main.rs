use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Json;
use axum::extract::State;
use axum::routing::get;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use aigw_core::{GatewayState, UpstreamClient, UpstreamClientConfig, proxy_handler};
use aigw_routing::StrategyRegistry;
use aigw_usage::TrackerSet;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log)),
        )
        .init();

    let registry =
        Arc::new(StrategyRegistry::builtin().context("register provider strategies")?);
    let client = Arc::new(
        UpstreamClient::new(UpstreamClientConfig::default()).context("build upstream client")?,
    );
    let state = Arc::new(GatewayState {
        registry,
        client,
        trackers: Arc::new(TrackerSet::with_default_sink()),
    });

    let app = axum::Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/providers", get(providers))
        .fallback(proxy_handler)
        .with_state(state);

    let bind = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("bind {bind}"))?;
    tracing::info!(addr = %bind, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn providers(State(state): State<Arc<GatewayState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "providers": state.registry.names() }))
}

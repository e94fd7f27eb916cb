// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use revenant_node::config::NodeConfig;
use revenant_node::server::{build_router, AppState};
use revenant_node::telemetry::init_telemetry;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_telemetry()?;

    let cfg = NodeConfig::from_env()?;
    tracing::info!("Initializing Revenant Node with config: {:?}", cfg);

    if cfg.ledger.is_none() {
        tracing::warn!("No ledger credential configured; salvage runs in demo mode");
    }
    if let Some(price) = cfg.salvage_price {
        tracing::info!("Salvage requires a payment of {} base units", price);
    }

    let state = AppState::from_config(&cfg)?;
    let app = build_router(state, cfg.api_token.clone());

    let addr = cfg.bind_addr;
    tracing::info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

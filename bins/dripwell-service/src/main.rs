//! dripwell-service — HTTP front end for the Dripwell claim engine.
//!
//! Serves a REST API at `/api/*` for pool inspection, claims, public
//! funding, and admin operations. State is held in memory: one engine over
//! a [`MemoryVault`], intended for testnets and demos. Every mutating
//! request names its caller explicitly; the engine enforces which callers
//! may do what.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tracing::info;

mod config;
mod routes;

use config::Config;
use dripwell_core::display::format_units;
use dripwell_core::engine::Engine;
use dripwell_core::entropy::OsEntropy;
use dripwell_core::types::AssetId;
use dripwell_core::vault::MemoryVault;

/// Shared application state passed to every Axum handler.
#[derive(Clone)]
pub struct AppState {
    /// The engine, locked for the duration of each operation.
    pub engine: Arc<Mutex<Engine<MemoryVault, OsEntropy>>>,
    /// Service configuration.
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("Failed to load service configuration")?;

    info!(
        bind = %config.bind_addr,
        admin = %config.admin,
        cooldown_secs = config.cooldown_secs,
        day_length_secs = config.day_length_secs,
        "Starting dripwell-service"
    );

    let mut vault = MemoryVault::new();
    if config.genesis > 0 {
        vault.mint_holdings(AssetId::NATIVE, config.genesis);
        info!(genesis = %format_units(config.genesis), "Genesis holdings minted");
    }

    let mut engine = Engine::new(config.engine_config(), vault, OsEntropy);
    if config.pool_total > 0 || config.max_send > 0 {
        engine
            .set_pool(
                config.admin,
                AssetId::NATIVE,
                config.pool_total,
                config.max_send,
                true,
            )
            .context("Failed to configure the startup pool")?;
        info!(
            total = %format_units(config.pool_total),
            max_send = %format_units(config.max_send),
            "Startup pool configured"
        );
    }

    let state = AppState {
        engine: Arc::new(Mutex::new(engine)),
        config: Arc::new(config.clone()),
    };

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;

    Ok(())
}

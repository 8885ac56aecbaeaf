//! Service configuration loaded from environment variables.

use anyhow::{Context, Result};

use dripwell_core::config::EngineConfig;
use dripwell_core::constants::{DEFAULT_COOLDOWN_SECS, DEFAULT_DAY_LENGTH_SECS, UNIT};
use dripwell_core::types::{Address, Amount};

#[derive(Clone, Debug)]
pub struct Config {
    /// Address to bind the HTTP server.
    pub bind_addr: String,
    /// The admin identity, fixed for the engine's lifetime.
    pub admin: Address,
    /// Cooldown between claims per (user, asset), in seconds.
    pub cooldown_secs: u64,
    /// Window within which a claim continues a streak, in seconds.
    pub day_length_secs: u64,
    /// Native units minted into the vault at startup, in base units.
    pub genesis: Amount,
    /// Portion of genesis allocated to the native pool at startup.
    pub pool_total: Amount,
    /// Per-claim cap for the startup native pool.
    pub max_send: Amount,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("DRIPWELL_BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let admin: Address = std::env::var("DRIPWELL_ADMIN_ADDRESS")
            .context("DRIPWELL_ADMIN_ADDRESS is required")?
            .parse()
            .context("DRIPWELL_ADMIN_ADDRESS must be a 0x-prefixed 20-byte hex address")?;

        let cooldown_secs: u64 = std::env::var("DRIPWELL_COOLDOWN_SECS")
            .unwrap_or_else(|_| DEFAULT_COOLDOWN_SECS.to_string())
            .parse()
            .context("DRIPWELL_COOLDOWN_SECS must be a positive integer")?;

        let day_length_secs: u64 = std::env::var("DRIPWELL_DAY_LENGTH_SECS")
            .unwrap_or_else(|_| DEFAULT_DAY_LENGTH_SECS.to_string())
            .parse()
            .context("DRIPWELL_DAY_LENGTH_SECS must be a positive integer")?;

        let genesis = whole_units_env("DRIPWELL_GENESIS_UNITS", 0)?;
        let pool_total = whole_units_env("DRIPWELL_POOL_UNITS", 0)?;
        let max_send = whole_units_env("DRIPWELL_MAX_SEND_UNITS", 0)?;

        Ok(Config {
            bind_addr,
            admin,
            cooldown_secs,
            day_length_secs,
            genesis,
            pool_total,
            max_send,
        })
    }

    /// The engine-side view of this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            admin: self.admin,
            cooldown_secs: self.cooldown_secs,
            day_length_secs: self.day_length_secs,
        }
    }
}

/// Read an env var holding whole display units and scale it to base units.
fn whole_units_env(name: &str, default: u128) -> Result<Amount> {
    let whole: u128 = std::env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .with_context(|| format!("{name} must be a non-negative integer"))?;
    whole
        .checked_mul(UNIT)
        .with_context(|| format!("{name} overflow"))
}

//! Shared test helpers for E2E and adversarial tests.

use dripwell_core::config::EngineConfig;
use dripwell_core::engine::Engine;
use dripwell_core::entropy::SeededEntropy;
use dripwell_core::traits::EntropySource;
use dripwell_core::types::{Address, Amount, AssetId};
use dripwell_core::vault::MemoryVault;

/// Claim cooldown used by the test engines: 15 minutes.
pub const COOLDOWN_SECS: u64 = 900;

/// Streak window used by the test engines: one day.
pub const DAY_SECS: u64 = 86_400;

/// An arbitrary fixed deployment time, unix seconds.
pub const T0: u64 = 1_700_000_000;

/// The test admin identity.
pub fn admin() -> Address {
    Address([0xAA; 20])
}

/// Simple address from a seed byte.
pub fn addr(seed: u8) -> Address {
    Address([seed; 20])
}

/// Simple non-native asset id from a seed byte.
pub fn token(seed: u8) -> AssetId {
    AssetId::token([seed; 20])
}

/// Engine configuration with the short test cadence.
pub fn test_config() -> EngineConfig {
    EngineConfig {
        admin: admin(),
        cooldown_secs: COOLDOWN_SECS,
        day_length_secs: DAY_SECS,
    }
}

/// A bare engine over an empty vault, no pools configured.
pub fn empty_engine(seed: u64) -> Engine<MemoryVault, SeededEntropy> {
    Engine::new(test_config(), MemoryVault::new(), SeededEntropy::new(seed))
}

/// Engine holding `total` native units, all allocated to a configured
/// native pool with the given per-claim cap.
pub fn funded_engine(total: Amount, max_send: Amount) -> Engine<MemoryVault, SeededEntropy> {
    funded_engine_seeded(total, max_send, 0xD21F)
}

/// Same as [`funded_engine`] with a caller-controlled entropy seed.
pub fn funded_engine_seeded(
    total: Amount,
    max_send: Amount,
    seed: u64,
) -> Engine<MemoryVault, SeededEntropy> {
    let mut vault = MemoryVault::new();
    vault.mint_holdings(AssetId::NATIVE, total);
    let mut engine = Engine::new(test_config(), vault, SeededEntropy::new(seed));
    engine
        .set_pool(admin(), AssetId::NATIVE, total, max_send, true)
        .unwrap();
    engine
}

/// Entropy that always draws the top of the range. Makes payouts
/// deterministic and maximally pool-draining.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaxEntropy;

impl EntropySource for MaxEntropy {
    fn draw_in_range(&mut self, _lo: Amount, hi: Amount) -> Amount {
        hi
    }
}

/// Entropy that always draws the bottom of the range.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinEntropy;

impl EntropySource for MinEntropy {
    fn draw_in_range(&mut self, lo: Amount, _hi: Amount) -> Amount {
        lo
    }
}

/// Engine with a configured native pool and caller-chosen entropy.
pub fn funded_engine_with<E: EntropySource>(
    total: Amount,
    max_send: Amount,
    entropy: E,
) -> Engine<MemoryVault, E> {
    let mut vault = MemoryVault::new();
    vault.mint_holdings(AssetId::NATIVE, total);
    let mut engine = Engine::new(test_config(), vault, entropy);
    engine
        .set_pool(admin(), AssetId::NATIVE, total, max_send, true)
        .unwrap();
    engine
}

//! Criterion benchmarks for dripwell-core critical operations.
//!
//! Covers: streak math, the claim hot path, and batch staging.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dripwell_core::config::EngineConfig;
use dripwell_core::constants::UNIT;
use dripwell_core::engine::Engine;
use dripwell_core::entropy::SeededEntropy;
use dripwell_core::streak::{bonus_multiplier_bps, effective_cap};
use dripwell_core::types::{Address, AssetId};
use dripwell_core::vault::MemoryVault;

const DAY: u64 = 86_400;

fn admin() -> Address {
    Address([0xAA; 20])
}

fn seeded_engine(total: u128, max_send: u128) -> Engine<MemoryVault, SeededEntropy> {
    let mut vault = MemoryVault::new();
    vault.mint_holdings(AssetId::NATIVE, total);
    let mut engine = Engine::new(
        EngineConfig::new(admin()),
        vault,
        SeededEntropy::new(0xD21F),
    );
    engine
        .set_pool(admin(), AssetId::NATIVE, total, max_send, true)
        .unwrap();
    engine
}

fn bench_bonus_multiplier(c: &mut Criterion) {
    c.bench_function("bonus_multiplier", |b| {
        b.iter(|| bonus_multiplier_bps(black_box(137)))
    });
}

fn bench_effective_cap(c: &mut Criterion) {
    let max_send = 100 * UNIT;
    let pool_total = 1_000_000 * UNIT;

    c.bench_function("effective_cap", |b| {
        b.iter(|| effective_cap(black_box(max_send), black_box(40), black_box(pool_total)))
    });
}

fn bench_claim(c: &mut Criterion) {
    // Distinct callers so the cooldown never blocks a draw.
    let mut engine = seeded_engine(1_000_000_000 * UNIT, UNIT);
    let mut seed: u64 = 0;

    c.bench_function("claim", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let mut bytes = [0u8; 20];
            bytes[..8].copy_from_slice(&seed.to_be_bytes());
            engine
                .claim(Address(bytes), AssetId::NATIVE, black_box(seed * DAY))
                .unwrap()
        })
    });
}

fn bench_batch_send(c: &mut Criterion) {
    let mut engine = seeded_engine(1_000_000_000 * UNIT, UNIT);
    let recipients: Vec<Address> = (1..=64u8).map(|n| Address([n; 20])).collect();

    c.bench_function("admin_batch_send_64", |b| {
        b.iter(|| {
            engine
                .admin_batch_send(admin(), AssetId::NATIVE, black_box(&recipients), UNIT)
                .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_bonus_multiplier,
    bench_effective_cap,
    bench_claim,
    bench_batch_send,
);
criterion_main!(benches);

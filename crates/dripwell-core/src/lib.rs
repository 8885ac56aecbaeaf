//! # dripwell-core
//! Pool accounting, streak bonuses, and the claim engine for Dripwell.
//!
//! All amount arithmetic is integer-only (wei-scale `u128`) for
//! determinism. Value custody sits behind the [`traits::BalanceAccessor`]
//! seam and randomness behind [`traits::EntropySource`], so the engine
//! itself is a deterministic state machine.

pub mod config;
pub mod constants;
pub mod display;
pub mod engine;
pub mod entropy;
pub mod error;
pub mod ledger;
pub mod streak;
pub mod traits;
pub mod types;
pub mod users;
pub mod vault;

pub use engine::Engine;
pub use types::{Address, Amount, AssetId, BatchReceipt, ClaimReceipt, Pool, UserClaimState};

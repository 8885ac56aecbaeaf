//! Engine constants. All monetary values in base units (1 unit = 10^18).

use crate::types::Amount;

/// One whole unit of any asset (18 decimal places).
pub const UNIT: Amount = 1_000_000_000_000_000_000;

/// Smallest amount a claim or batch draw may pay: 0.01 of a unit.
///
/// A pool whose effective cap falls below this floor is treated as exhausted
/// rather than paying dust or drawing from an empty range.
///
/// # Examples
///
/// ```
/// use dripwell_core::constants::{MIN_CLAIM, UNIT};
/// assert_eq!(MIN_CLAIM, UNIT / 100);
/// ```
pub const MIN_CLAIM: Amount = UNIT / 100;

pub const BPS_PRECISION: Amount = 10_000;

/// Streak bonus per completed tier, in basis points (+10%, non-compounding).
pub const STREAK_BONUS_BPS: Amount = 1_000;

/// Consecutive qualifying claims that complete one bonus tier.
pub const STREAK_TIER: u64 = 10;

/// Default minimum wait between successful claims: 24 hours.
pub const DEFAULT_COOLDOWN_SECS: u64 = 86_400;

/// Default streak window: a claim within 48 hours of the previous one
/// continues the streak; a longer gap resets it to day one.
pub const DEFAULT_DAY_LENGTH_SECS: u64 = 172_800;

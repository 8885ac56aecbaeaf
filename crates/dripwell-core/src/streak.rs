//! Claim cadence math: cooldown gating and streak bonuses.
//!
//! A streak counts consecutive qualifying claims. A claim within one day
//! window of the previous claim extends the streak; a longer gap resets it
//! to day one. Every completed tier of
//! [`STREAK_TIER`](crate::constants::STREAK_TIER) consecutive days adds a
//! flat +10% ([`STREAK_BONUS_BPS`](crate::constants::STREAK_BONUS_BPS)) to
//! the pool's per-claim ceiling, non-compounding:
//!
//! - streak 1–9: 100% of `max_send`
//! - streak 10–19: 110%
//! - streak 20–29: 120%
//! - …
//!
//! The boosted ceiling is always re-capped by what remains in the pool, so a
//! long streak can never claim more than the pool holds.
//!
//! All functions here are pure; the engine owns when they are called.

use crate::constants::{BPS_PRECISION, STREAK_BONUS_BPS, STREAK_TIER};
use crate::error::EngineError;
use crate::types::Amount;

/// Seconds of cooldown remaining before the next claim, or `None` if a claim
/// is allowed now.
///
/// `last_claim == 0` means the user has never claimed; there is no cooldown.
/// A claim is allowed at exactly `last_claim + cooldown_secs`.
pub fn cooldown_remaining(last_claim: u64, now: u64, cooldown_secs: u64) -> Option<u64> {
    if last_claim == 0 {
        return None;
    }
    let ready_at = last_claim.saturating_add(cooldown_secs);
    if now < ready_at {
        Some(ready_at - now)
    } else {
        None
    }
}

/// The streak value a claim at `now` produces.
///
/// First-ever claims (`last_claim == 0`) start at 1. A claim within
/// `day_length_secs` of the previous one extends the streak by 1; a longer
/// gap starts a fresh streak at 1 (the current claim counts as day one).
pub fn next_streak(prev_streak: u64, last_claim: u64, now: u64, day_length_secs: u64) -> u64 {
    if last_claim == 0 {
        return 1;
    }
    if now.saturating_sub(last_claim) <= day_length_secs {
        prev_streak.saturating_add(1)
    } else {
        1
    }
}

/// Number of completed bonus tiers for a streak: `streak / STREAK_TIER`.
pub fn completed_tiers(streak: u64) -> u64 {
    streak / STREAK_TIER
}

/// Payout multiplier for a streak, in basis points.
///
/// `10_000` (no bonus) below the first tier, `11_000` for streaks 10–19,
/// `12_000` for 20–29, and so on. Linear in completed tiers; the product
/// fits u128 for every possible `u64` streak.
pub fn bonus_multiplier_bps(streak: u64) -> Amount {
    BPS_PRECISION + STREAK_BONUS_BPS * completed_tiers(streak) as Amount
}

/// `max_send` scaled by the streak multiplier.
///
/// # Errors
///
/// Returns [`EngineError::AmountOverflow`] if the scaled value exceeds u128.
pub fn boosted_max_send(max_send: Amount, streak: u64) -> Result<Amount, EngineError> {
    max_send
        .checked_mul(bonus_multiplier_bps(streak))
        .map(|scaled| scaled / BPS_PRECISION)
        .ok_or(EngineError::AmountOverflow)
}

/// The bound a claim's payout is drawn against: the streak-boosted ceiling,
/// never more than what remains in the pool.
///
/// # Errors
///
/// Returns [`EngineError::AmountOverflow`] if the boost computation overflows.
pub fn effective_cap(
    max_send: Amount,
    streak: u64,
    pool_total: Amount,
) -> Result<Amount, EngineError> {
    Ok(boosted_max_send(max_send, streak)?.min(pool_total))
}

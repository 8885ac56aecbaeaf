//! The pool ledger: per-asset claim allocations.
//!
//! One pool per asset. Reads are total: an asset nobody has configured reads
//! as the zero-valued pool. The ledger does checked accounting on pool
//! totals; whether the backing balance actually covers a total is the
//! engine's cross-check against the balance accessor.

use std::collections::HashMap;

use crate::error::EngineError;
use crate::types::{Amount, AssetId, Pool};

/// Owned map from asset to its pool.
///
/// Pools are never removed; resetting one means setting zero amounts.
#[derive(Debug, Default, Clone)]
pub struct PoolLedger {
    pools: HashMap<AssetId, Pool>,
}

impl PoolLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// The pool for `asset`; the zero-valued pool if none was ever set.
    pub fn get(&self, asset: AssetId) -> Pool {
        self.pools.get(&asset).copied().unwrap_or_default()
    }

    /// Whether a pool record exists for `asset` (even a zero-valued one).
    pub fn contains(&self, asset: AssetId) -> bool {
        self.pools.contains_key(&asset)
    }

    /// Replace the pool for `asset` wholesale.
    pub fn set(&mut self, asset: AssetId, pool: Pool) {
        self.pools.insert(asset, pool);
    }

    /// Add `amount` to the pool's total, creating a zero pool if absent.
    /// Returns the new total.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AmountOverflow`] if the total would exceed
    /// u128; the pool is unchanged on error.
    pub fn credit(&mut self, asset: AssetId, amount: Amount) -> Result<Amount, EngineError> {
        let pool = self.get(asset);
        let total = pool
            .total
            .checked_add(amount)
            .ok_or(EngineError::AmountOverflow)?;
        self.pools.insert(asset, Pool { total, ..pool });
        Ok(total)
    }

    /// Subtract `amount` from the pool's total. Returns the new total.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InsufficientPool`] if `amount` exceeds the
    /// pool's total; the pool is unchanged on error.
    pub fn debit(&mut self, asset: AssetId, amount: Amount) -> Result<Amount, EngineError> {
        let pool = self.get(asset);
        let total = pool
            .total
            .checked_sub(amount)
            .ok_or(EngineError::InsufficientPool {
                have: pool.total,
                need: amount,
            })?;
        self.pools.insert(asset, Pool { total, ..pool });
        Ok(total)
    }

    /// All pools, sorted by asset id for stable output.
    pub fn all(&self) -> Vec<(AssetId, Pool)> {
        let mut pools: Vec<_> = self.pools.iter().map(|(a, p)| (*a, *p)).collect();
        pools.sort_by_key(|(asset, _)| *asset);
        pools
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::UNIT;

    fn token(seed: u8) -> AssetId {
        AssetId::token([seed; 20])
    }

    #[test]
    fn unknown_asset_reads_as_zero_pool() {
        let ledger = PoolLedger::new();
        assert_eq!(ledger.get(AssetId::NATIVE), Pool::default());
        assert!(!ledger.contains(AssetId::NATIVE));
    }

    #[test]
    fn set_replaces_wholesale() {
        let mut ledger = PoolLedger::new();
        ledger.set(
            AssetId::NATIVE,
            Pool { total: 5 * UNIT, max_send: UNIT, is_native: true },
        );
        ledger.set(
            AssetId::NATIVE,
            Pool { total: UNIT, max_send: UNIT / 2, is_native: true },
        );

        let pool = ledger.get(AssetId::NATIVE);
        assert_eq!(pool.total, UNIT);
        assert_eq!(pool.max_send, UNIT / 2);
    }

    #[test]
    fn credit_creates_and_accumulates() {
        let mut ledger = PoolLedger::new();
        assert_eq!(ledger.credit(token(1), UNIT).unwrap(), UNIT);
        assert_eq!(ledger.credit(token(1), 2 * UNIT).unwrap(), 3 * UNIT);
        // Created pools start unconfigured.
        assert_eq!(ledger.get(token(1)).max_send, 0);
    }

    #[test]
    fn credit_preserves_configuration() {
        let mut ledger = PoolLedger::new();
        ledger.set(
            token(1),
            Pool { total: UNIT, max_send: UNIT / 10, is_native: false },
        );
        ledger.credit(token(1), UNIT).unwrap();

        let pool = ledger.get(token(1));
        assert_eq!(pool.total, 2 * UNIT);
        assert_eq!(pool.max_send, UNIT / 10);
    }

    #[test]
    fn credit_overflow_is_an_error_and_no_op() {
        let mut ledger = PoolLedger::new();
        ledger.set(
            token(1),
            Pool { total: Amount::MAX, max_send: UNIT, is_native: false },
        );
        assert_eq!(
            ledger.credit(token(1), 1).unwrap_err(),
            EngineError::AmountOverflow
        );
        assert_eq!(ledger.get(token(1)).total, Amount::MAX);
    }

    #[test]
    fn debit_reduces_total() {
        let mut ledger = PoolLedger::new();
        ledger.set(
            token(2),
            Pool { total: 3 * UNIT, max_send: UNIT, is_native: false },
        );
        assert_eq!(ledger.debit(token(2), UNIT).unwrap(), 2 * UNIT);
        assert_eq!(ledger.get(token(2)).total, 2 * UNIT);
    }

    #[test]
    fn debit_beyond_total_fails_and_leaves_pool() {
        let mut ledger = PoolLedger::new();
        ledger.set(
            token(2),
            Pool { total: UNIT, max_send: UNIT, is_native: false },
        );
        assert_eq!(
            ledger.debit(token(2), UNIT + 1).unwrap_err(),
            EngineError::InsufficientPool { have: UNIT, need: UNIT + 1 }
        );
        assert_eq!(ledger.get(token(2)).total, UNIT);
    }

    #[test]
    fn all_is_sorted_by_asset() {
        let mut ledger = PoolLedger::new();
        ledger.set(token(9), Pool::default());
        ledger.set(AssetId::NATIVE, Pool::default());
        ledger.set(token(3), Pool::default());

        let assets: Vec<_> = ledger.all().into_iter().map(|(a, _)| a).collect();
        assert_eq!(assets, vec![AssetId::NATIVE, token(3), token(9)]);
    }
}

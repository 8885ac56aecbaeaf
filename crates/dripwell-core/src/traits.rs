//! Trait interfaces for the Dripwell engine.
//!
//! These traits define the engine's external seams:
//! - [`BalanceAccessor`] — holds and moves actual value (the vault layer implements)
//! - [`EntropySource`] — supplies the randomness behind claim draws (swappable for tests)

use crate::error::VaultError;
use crate::types::{Address, Amount, AssetId};

/// Custody of the engine's actual holdings, per asset.
///
/// The engine never stores balances itself; pool totals and the derived
/// reserve are accounting entries against whatever this accessor reports.
/// Implementations decide the transfer mechanism (native value vs. token
/// ledger) from the asset id.
pub trait BalanceAccessor: Send + Sync {
    /// The engine's current holdings of `asset` (pools plus reserve).
    fn balance_of(&self, asset: AssetId) -> Amount;

    /// Pay `amount` of `asset` from the engine's holdings to `to`.
    ///
    /// # Errors
    ///
    /// Fails without moving any value if the holdings are short or the
    /// transfer is otherwise rejected.
    fn transfer_out(
        &mut self,
        asset: AssetId,
        to: Address,
        amount: Amount,
    ) -> Result<(), VaultError>;

    /// Pull `amount` of `asset` from `from` into the engine's holdings.
    ///
    /// # Errors
    ///
    /// Fails without moving any value if `from` cannot cover `amount`.
    fn transfer_in(
        &mut self,
        asset: AssetId,
        from: Address,
        amount: Amount,
    ) -> Result<(), VaultError>;

    /// Whether the engine's holdings of `asset` cover `amount`.
    ///
    /// Default implementation delegates to [`balance_of`](Self::balance_of).
    fn can_cover(&self, asset: AssetId, amount: Amount) -> bool {
        self.balance_of(asset) >= amount
    }
}

/// Source of the pseudo-random draws behind claims and batch sends.
///
/// Injectable so the production source (reseeded from the OS per draw) can be
/// swapped for a deterministic seed in tests without touching engine logic.
/// Not cryptographically secure by contract; a manipulable draw bounds payout
/// size but never violates pool accounting.
pub trait EntropySource: Send + Sync {
    /// Draw a uniformly distributed amount in the inclusive range `[lo, hi]`.
    ///
    /// Callers guarantee `lo <= hi`.
    fn draw_in_range(&mut self, lo: Amount, hi: Amount) -> Amount;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // ------------------------------------------------------------------
    // Mock: BalanceAccessor
    // ------------------------------------------------------------------

    struct MockAccessor {
        holdings: HashMap<AssetId, Amount>,
        paid: Vec<(AssetId, Address, Amount)>,
    }

    impl MockAccessor {
        fn new() -> Self {
            Self {
                holdings: HashMap::new(),
                paid: Vec::new(),
            }
        }

        fn with_holding(mut self, asset: AssetId, amount: Amount) -> Self {
            self.holdings.insert(asset, amount);
            self
        }
    }

    impl BalanceAccessor for MockAccessor {
        fn balance_of(&self, asset: AssetId) -> Amount {
            *self.holdings.get(&asset).unwrap_or(&0)
        }

        fn transfer_out(
            &mut self,
            asset: AssetId,
            to: Address,
            amount: Amount,
        ) -> Result<(), VaultError> {
            let have = self.balance_of(asset);
            if have < amount {
                return Err(VaultError::InsufficientBalance { have, need: amount });
            }
            self.holdings.insert(asset, have - amount);
            self.paid.push((asset, to, amount));
            Ok(())
        }

        fn transfer_in(
            &mut self,
            asset: AssetId,
            _from: Address,
            amount: Amount,
        ) -> Result<(), VaultError> {
            let have = self.balance_of(asset);
            let new = have.checked_add(amount).ok_or(VaultError::BalanceOverflow)?;
            self.holdings.insert(asset, new);
            Ok(())
        }
    }

    // ------------------------------------------------------------------
    // Mock: EntropySource
    // ------------------------------------------------------------------

    struct FloorEntropy;

    impl EntropySource for FloorEntropy {
        fn draw_in_range(&mut self, lo: Amount, _hi: Amount) -> Amount {
            lo
        }
    }

    // ------------------------------------------------------------------
    // Object safety: verify each trait is dyn-compatible
    // ------------------------------------------------------------------

    fn _assert_balance_accessor_object_safe(ba: &dyn BalanceAccessor) {
        let _ = ba.balance_of(AssetId::NATIVE);
    }

    fn _assert_entropy_source_object_safe(es: &mut dyn EntropySource) {
        let _ = es.draw_in_range(0, 1);
    }

    // ------------------------------------------------------------------
    // BalanceAccessor tests
    // ------------------------------------------------------------------

    #[test]
    fn transfer_out_debits_holdings() {
        let mut ba = MockAccessor::new().with_holding(AssetId::NATIVE, 100);
        let to = Address([1; 20]);
        ba.transfer_out(AssetId::NATIVE, to, 60).unwrap();
        assert_eq!(ba.balance_of(AssetId::NATIVE), 40);
        assert_eq!(ba.paid, vec![(AssetId::NATIVE, to, 60)]);
    }

    #[test]
    fn transfer_out_short_holdings_fail_cleanly() {
        let mut ba = MockAccessor::new().with_holding(AssetId::NATIVE, 10);
        let err = ba
            .transfer_out(AssetId::NATIVE, Address([1; 20]), 11)
            .unwrap_err();
        assert_eq!(err, VaultError::InsufficientBalance { have: 10, need: 11 });
        // Nothing moved.
        assert_eq!(ba.balance_of(AssetId::NATIVE), 10);
        assert!(ba.paid.is_empty());
    }

    #[test]
    fn transfer_in_credits_holdings() {
        let mut ba = MockAccessor::new();
        ba.transfer_in(AssetId::NATIVE, Address([2; 20]), 25).unwrap();
        assert_eq!(ba.balance_of(AssetId::NATIVE), 25);
    }

    #[test]
    fn can_cover_default_impl() {
        let ba = MockAccessor::new().with_holding(AssetId::NATIVE, 50);
        assert!(ba.can_cover(AssetId::NATIVE, 50));
        assert!(!ba.can_cover(AssetId::NATIVE, 51));
        assert!(!ba.can_cover(AssetId::token([3; 20]), 1));
    }

    #[test]
    fn accessor_as_dyn() {
        let mut ba = MockAccessor::new().with_holding(AssetId::NATIVE, 5);
        let dyn_ba: &mut dyn BalanceAccessor = &mut ba;
        assert_eq!(dyn_ba.balance_of(AssetId::NATIVE), 5);
        assert!(dyn_ba.transfer_out(AssetId::NATIVE, Address::ZERO, 5).is_ok());
    }

    // ------------------------------------------------------------------
    // EntropySource tests
    // ------------------------------------------------------------------

    #[test]
    fn entropy_as_dyn() {
        let mut es = FloorEntropy;
        let dyn_es: &mut dyn EntropySource = &mut es;
        assert_eq!(dyn_es.draw_in_range(7, 9), 7);
    }
}

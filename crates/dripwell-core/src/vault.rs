//! In-memory balance custody.
//!
//! [`MemoryVault`] is the in-process implementation of
//! [`BalanceAccessor`], suitable for tests and the demo service host. A real
//! deployment would put a chain or payment-rail client behind the same trait.

use std::collections::HashMap;

use crate::error::VaultError;
use crate::traits::BalanceAccessor;
use crate::types::{Address, Amount, AssetId};

/// In-memory vault: external account balances plus the engine's own holdings.
///
/// `transfer_in` moves value from an account into the engine's holdings,
/// `transfer_out` the reverse. A failed transfer never mutates either side.
#[derive(Debug, Default, Clone)]
pub struct MemoryVault {
    /// External account balances, per (account, asset).
    accounts: HashMap<(Address, AssetId), Amount>,
    /// The engine's holdings, per asset.
    holdings: HashMap<AssetId, Amount>,
    /// When set, the next transfer (either direction) fails once. Test hook
    /// for rollback coverage.
    fail_next: bool,
}

impl MemoryVault {
    /// Create an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an external account out of thin air. Fixture/genesis use only.
    pub fn mint(&mut self, account: Address, asset: AssetId, amount: Amount) {
        let entry = self.accounts.entry((account, asset)).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Credit the engine's holdings directly. Fixture/genesis use only.
    pub fn mint_holdings(&mut self, asset: AssetId, amount: Amount) {
        let entry = self.holdings.entry(asset).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Balance of an external account; zero if it has never held this asset.
    pub fn account_balance(&self, account: Address, asset: AssetId) -> Amount {
        *self.accounts.get(&(account, asset)).unwrap_or(&0)
    }

    /// Force the next transfer to fail with [`VaultError::Rejected`].
    pub fn fail_next_transfer(&mut self) {
        self.fail_next = true;
    }

    fn take_forced_failure(&mut self) -> Result<(), VaultError> {
        if self.fail_next {
            self.fail_next = false;
            return Err(VaultError::Rejected("forced test failure".into()));
        }
        Ok(())
    }
}

impl BalanceAccessor for MemoryVault {
    fn balance_of(&self, asset: AssetId) -> Amount {
        *self.holdings.get(&asset).unwrap_or(&0)
    }

    fn transfer_out(
        &mut self,
        asset: AssetId,
        to: Address,
        amount: Amount,
    ) -> Result<(), VaultError> {
        self.take_forced_failure()?;
        let held = self.balance_of(asset);
        if held < amount {
            return Err(VaultError::InsufficientBalance {
                have: held,
                need: amount,
            });
        }
        let credited = self
            .account_balance(to, asset)
            .checked_add(amount)
            .ok_or(VaultError::BalanceOverflow)?;
        // All checks passed; commit both sides.
        self.holdings.insert(asset, held - amount);
        self.accounts.insert((to, asset), credited);
        Ok(())
    }

    fn transfer_in(
        &mut self,
        asset: AssetId,
        from: Address,
        amount: Amount,
    ) -> Result<(), VaultError> {
        self.take_forced_failure()?;
        let available = self.account_balance(from, asset);
        if available < amount {
            return Err(VaultError::InsufficientBalance {
                have: available,
                need: amount,
            });
        }
        let held = self
            .balance_of(asset)
            .checked_add(amount)
            .ok_or(VaultError::BalanceOverflow)?;
        self.accounts.insert((from, asset), available - amount);
        self.holdings.insert(asset, held);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::UNIT;

    fn addr(seed: u8) -> Address {
        Address([seed; 20])
    }

    #[test]
    fn empty_vault_reads_zero() {
        let vault = MemoryVault::new();
        assert_eq!(vault.balance_of(AssetId::NATIVE), 0);
        assert_eq!(vault.account_balance(addr(1), AssetId::NATIVE), 0);
    }

    #[test]
    fn transfer_in_moves_account_to_holdings() {
        let mut vault = MemoryVault::new();
        vault.mint(addr(1), AssetId::NATIVE, 10 * UNIT);

        vault.transfer_in(AssetId::NATIVE, addr(1), 3 * UNIT).unwrap();

        assert_eq!(vault.account_balance(addr(1), AssetId::NATIVE), 7 * UNIT);
        assert_eq!(vault.balance_of(AssetId::NATIVE), 3 * UNIT);
    }

    #[test]
    fn transfer_in_short_account_leaves_both_sides() {
        let mut vault = MemoryVault::new();
        vault.mint(addr(1), AssetId::NATIVE, UNIT);

        let err = vault
            .transfer_in(AssetId::NATIVE, addr(1), 2 * UNIT)
            .unwrap_err();
        assert_eq!(
            err,
            VaultError::InsufficientBalance { have: UNIT, need: 2 * UNIT }
        );
        assert_eq!(vault.account_balance(addr(1), AssetId::NATIVE), UNIT);
        assert_eq!(vault.balance_of(AssetId::NATIVE), 0);
    }

    #[test]
    fn transfer_out_moves_holdings_to_account() {
        let mut vault = MemoryVault::new();
        vault.mint_holdings(AssetId::NATIVE, 5 * UNIT);

        vault.transfer_out(AssetId::NATIVE, addr(2), 2 * UNIT).unwrap();

        assert_eq!(vault.balance_of(AssetId::NATIVE), 3 * UNIT);
        assert_eq!(vault.account_balance(addr(2), AssetId::NATIVE), 2 * UNIT);
    }

    #[test]
    fn transfer_out_short_holdings_leaves_both_sides() {
        let mut vault = MemoryVault::new();
        vault.mint_holdings(AssetId::NATIVE, UNIT);

        let err = vault
            .transfer_out(AssetId::NATIVE, addr(2), UNIT + 1)
            .unwrap_err();
        assert!(matches!(err, VaultError::InsufficientBalance { .. }));
        assert_eq!(vault.balance_of(AssetId::NATIVE), UNIT);
        assert_eq!(vault.account_balance(addr(2), AssetId::NATIVE), 0);
    }

    #[test]
    fn assets_are_isolated() {
        let token = AssetId::token([9; 20]);
        let mut vault = MemoryVault::new();
        vault.mint_holdings(AssetId::NATIVE, UNIT);
        vault.mint_holdings(token, 2 * UNIT);

        vault.transfer_out(AssetId::NATIVE, addr(1), UNIT).unwrap();

        assert_eq!(vault.balance_of(AssetId::NATIVE), 0);
        assert_eq!(vault.balance_of(token), 2 * UNIT);
    }

    #[test]
    fn forced_failure_fires_once() {
        let mut vault = MemoryVault::new();
        vault.mint_holdings(AssetId::NATIVE, UNIT);
        vault.fail_next_transfer();

        let err = vault
            .transfer_out(AssetId::NATIVE, addr(1), UNIT)
            .unwrap_err();
        assert!(matches!(err, VaultError::Rejected(_)));
        // Nothing moved.
        assert_eq!(vault.balance_of(AssetId::NATIVE), UNIT);

        // The hook is consumed; the retry goes through.
        vault.transfer_out(AssetId::NATIVE, addr(1), UNIT).unwrap();
        assert_eq!(vault.account_balance(addr(1), AssetId::NATIVE), UNIT);
    }
}

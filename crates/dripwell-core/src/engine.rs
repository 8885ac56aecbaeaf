//! The distribution engine: claims, streaks, and admin operations.
//!
//! [`Engine`] owns the pool ledger and the user claim store, keeps actual
//! value behind a [`BalanceAccessor`], and draws payout amounts from an
//! [`EntropySource`]. Operations run under a single logical writer
//! (`&mut self`); each either fully applies or leaves no trace.
//!
//! Payout operations follow a fixed discipline: validate, apply engine
//! state changes, then make the external transfer as the final step,
//! restoring the prior state if the transfer is rejected. Deposit
//! operations mirror attached-value semantics instead: the deposit lands
//! first and bookkeeping commits after, with every bookkeeping failure
//! checked before any value is pulled.

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::constants::MIN_CLAIM;
use crate::display::format_units;
use crate::error::EngineError;
use crate::ledger::PoolLedger;
use crate::streak;
use crate::traits::{BalanceAccessor, EntropySource};
use crate::types::{Address, Amount, AssetId, BatchReceipt, ClaimReceipt, Pool, UserClaimState};
use crate::users::UserClaimStore;

/// The pool/claim/streak accounting engine.
///
/// Construction fixes the admin identity and the claim cadence for the
/// engine's lifetime. The vault and entropy source are injected so tests can
/// run against an in-memory vault and a seeded generator.
pub struct Engine<V, E> {
    config: EngineConfig,
    pools: PoolLedger,
    users: UserClaimStore,
    vault: V,
    entropy: E,
}

impl<V: BalanceAccessor, E: EntropySource> Engine<V, E> {
    /// Create an engine with empty pools over the given vault.
    pub fn new(config: EngineConfig, vault: V, entropy: E) -> Self {
        Self {
            config,
            pools: PoolLedger::new(),
            users: UserClaimStore::new(),
            vault,
            entropy,
        }
    }

    /// The construction-time configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The pool for `asset`; zero-valued if never configured.
    pub fn get_pool(&self, asset: AssetId) -> Pool {
        self.pools.get(asset)
    }

    /// Every pool the engine has a record for, sorted by asset id.
    pub fn pools(&self) -> Vec<(AssetId, Pool)> {
        self.pools.all()
    }

    /// Claim state for any `(user, asset)` pair; zero-valued if the user has
    /// never claimed that asset.
    pub fn get_user_info(&self, user: Address, asset: AssetId) -> UserClaimState {
        self.users.get(user, asset)
    }

    /// The unallocated reserve for `asset`: vault holdings not assigned to
    /// the pool. Derived, never stored.
    pub fn reserve(&self, asset: AssetId) -> Amount {
        self.vault
            .balance_of(asset)
            .saturating_sub(self.pools.get(asset).total)
    }

    /// Read access to the vault.
    pub fn vault(&self) -> &V {
        &self.vault
    }

    /// Mutable access to the vault, for bootstrap funding and test hooks.
    /// Directly editing holdings can out-run pool accounting; engine
    /// operations are the supported path.
    pub fn vault_mut(&mut self) -> &mut V {
        &mut self.vault
    }

    // ------------------------------------------------------------------
    // Claim path
    // ------------------------------------------------------------------

    /// Claim a pseudo-random payout of `asset` for `caller` at time `now`
    /// (unix seconds, supplied by the host).
    ///
    /// The payout is drawn uniformly from `[MIN_CLAIM, effective_cap]`,
    /// where the cap is the pool's `max_send` boosted by the caller's streak
    /// and limited by what remains in the pool. A successful claim debits
    /// the pool, records the new streak and claim time, and pays the caller
    /// as the final step.
    ///
    /// # Errors
    ///
    /// - [`EngineError::PoolNotConfigured`] if the pool's `max_send` is zero
    /// - [`EngineError::ClaimTooSoon`] while the cooldown is running
    /// - [`EngineError::PoolExhausted`] if the cap falls below [`MIN_CLAIM`]
    /// - [`EngineError::TransferFailed`] if the vault rejects the payout;
    ///   pool and user state are rolled back to their prior values
    pub fn claim(
        &mut self,
        caller: Address,
        asset: AssetId,
        now: u64,
    ) -> Result<ClaimReceipt, EngineError> {
        let pool = self.pools.get(asset);
        if !pool.is_configured() {
            return Err(EngineError::PoolNotConfigured(asset.to_string()));
        }

        let prev = self.users.get(caller, asset);
        if let Some(retry_in_secs) =
            streak::cooldown_remaining(prev.last_claim, now, self.config.cooldown_secs)
        {
            debug!(%caller, %asset, retry_in_secs, "claim inside cooldown");
            return Err(EngineError::ClaimTooSoon { retry_in_secs });
        }

        let next_streak =
            streak::next_streak(prev.streak, prev.last_claim, now, self.config.day_length_secs);
        let cap = streak::effective_cap(pool.max_send, next_streak, pool.total)?;
        if cap < MIN_CLAIM {
            return Err(EngineError::PoolExhausted {
                cap,
                min: MIN_CLAIM,
            });
        }

        let amount = self.entropy.draw_in_range(MIN_CLAIM, cap);

        // Effects before the external payout.
        self.pools.debit(asset, amount)?;
        self.users.record(
            caller,
            asset,
            UserClaimState {
                streak: next_streak,
                effective_max_send: cap,
                last_claim: now,
            },
        );

        // Interaction last; undo the effects if the payout is rejected.
        if let Err(err) = self.vault.transfer_out(asset, caller, amount) {
            self.pools.set(asset, pool);
            self.users.record(caller, asset, prev);
            warn!(%caller, %asset, error = %err, "claim payout rejected, state rolled back");
            return Err(EngineError::TransferFailed(err.to_string()));
        }

        info!(
            %caller,
            %asset,
            amount = %format_units(amount),
            streak = next_streak,
            "claim paid"
        );
        Ok(ClaimReceipt {
            amount,
            streak: next_streak,
            effective_cap: cap,
        })
    }

    // ------------------------------------------------------------------
    // Admin operations
    // ------------------------------------------------------------------

    /// Replace the pool for `asset` wholesale. Admin only.
    ///
    /// This is the destructive reconfigure: `total` and `max_send` overwrite
    /// whatever was there. The new `total` is funded from the engine's
    /// existing balance, so it may not exceed the vault's holdings.
    ///
    /// # Errors
    ///
    /// [`EngineError::Unauthorized`] for non-admin callers;
    /// [`EngineError::InsufficientReserve`] if `total` exceeds the holdings.
    pub fn set_pool(
        &mut self,
        caller: Address,
        asset: AssetId,
        total: Amount,
        max_send: Amount,
        is_native: bool,
    ) -> Result<(), EngineError> {
        self.require_admin(caller)?;
        let balance = self.vault.balance_of(asset);
        if total > balance {
            return Err(EngineError::InsufficientReserve {
                have: balance,
                need: total,
            });
        }
        self.pools.set(
            asset,
            Pool {
                total,
                max_send,
                is_native,
            },
        );
        info!(
            %asset,
            total = %format_units(total),
            max_send = %format_units(max_send),
            is_native,
            "pool configured"
        );
        Ok(())
    }

    /// Pay `amount` from the pool straight to `to`, bypassing cooldown and
    /// streak. Admin only.
    ///
    /// # Errors
    ///
    /// [`EngineError::Unauthorized`], [`EngineError::InsufficientPool`] if
    /// the pool's total is short, or [`EngineError::TransferFailed`] with
    /// the pool restored.
    pub fn admin_send(
        &mut self,
        caller: Address,
        asset: AssetId,
        to: Address,
        amount: Amount,
    ) -> Result<(), EngineError> {
        self.require_admin(caller)?;
        let pool = self.pools.get(asset);
        self.pools.debit(asset, amount)?;

        if let Err(err) = self.vault.transfer_out(asset, to, amount) {
            self.pools.set(asset, pool);
            warn!(%to, %asset, error = %err, "admin send rejected, pool restored");
            return Err(EngineError::TransferFailed(err.to_string()));
        }
        info!(%to, %asset, amount = %format_units(amount), "admin send");
        Ok(())
    }

    /// Pay each recipient an independent uniform draw in
    /// `[MIN_CLAIM, max_send]`, in the caller-supplied order. Admin only.
    ///
    /// All draws are staged and their aggregate verified against the pool
    /// and the vault before any value moves, so a short pool fails the
    /// whole batch with nobody paid.
    ///
    /// # Errors
    ///
    /// [`EngineError::Unauthorized`]; [`EngineError::PoolExhausted`] if
    /// `max_send` is below [`MIN_CLAIM`]; [`EngineError::InsufficientPool`]
    /// if the staged aggregate exceeds the pool's total;
    /// [`EngineError::TransferFailed`] if the vault rejects a payout, with
    /// the pool restored and already-paid recipients clawed back.
    pub fn admin_batch_send(
        &mut self,
        caller: Address,
        asset: AssetId,
        recipients: &[Address],
        max_send: Amount,
    ) -> Result<BatchReceipt, EngineError> {
        self.require_admin(caller)?;
        if recipients.is_empty() {
            return Ok(BatchReceipt {
                payouts: Vec::new(),
                total: 0,
            });
        }
        if max_send < MIN_CLAIM {
            return Err(EngineError::PoolExhausted {
                cap: max_send,
                min: MIN_CLAIM,
            });
        }

        // Stage every draw before any value moves.
        let pool = self.pools.get(asset);
        let mut payouts = Vec::with_capacity(recipients.len());
        let mut total: Amount = 0;
        for &to in recipients {
            let amount = self.entropy.draw_in_range(MIN_CLAIM, max_send);
            total = total
                .checked_add(amount)
                .ok_or(EngineError::AmountOverflow)?;
            payouts.push((to, amount));
        }
        if total > pool.total {
            return Err(EngineError::InsufficientPool {
                have: pool.total,
                need: total,
            });
        }
        if !self.vault.can_cover(asset, total) {
            return Err(EngineError::TransferFailed(format!(
                "vault holds {} of {}, batch needs {}",
                self.vault.balance_of(asset),
                asset,
                total
            )));
        }

        // Commit the debit, then pay out. A rejected payout claws back the
        // recipients already paid and restores the pool.
        self.pools.debit(asset, total)?;
        for (i, &(to, amount)) in payouts.iter().enumerate() {
            if let Err(err) = self.vault.transfer_out(asset, to, amount) {
                for &(paid_to, paid_amount) in &payouts[..i] {
                    if let Err(claw) = self.vault.transfer_in(asset, paid_to, paid_amount) {
                        warn!(
                            to = %paid_to,
                            error = %claw,
                            "could not reverse partial batch payout"
                        );
                    }
                }
                self.pools.set(asset, pool);
                warn!(%to, %asset, error = %err, "batch send rejected, batch reverted");
                return Err(EngineError::TransferFailed(err.to_string()));
            }
        }

        info!(
            %asset,
            recipients = recipients.len(),
            total = %format_units(total),
            "batch send paid"
        );
        Ok(BatchReceipt { payouts, total })
    }

    /// Pay `amount` from the unallocated reserve to the admin. Admin only.
    ///
    /// Pool totals are untouched; only the derived reserve shrinks.
    ///
    /// # Errors
    ///
    /// [`EngineError::Unauthorized`];
    /// [`EngineError::InsufficientReserve`] if `amount` exceeds the reserve;
    /// [`EngineError::TransferFailed`] if the vault rejects the payout.
    pub fn withdraw(
        &mut self,
        caller: Address,
        asset: AssetId,
        amount: Amount,
    ) -> Result<(), EngineError> {
        self.require_admin(caller)?;
        let reserve = self.reserve(asset);
        if amount > reserve {
            return Err(EngineError::InsufficientReserve {
                have: reserve,
                need: amount,
            });
        }
        // The reserve is derived, so there is no bookkeeping to update.
        self.vault
            .transfer_out(asset, self.config.admin, amount)
            .map_err(|err| EngineError::TransferFailed(err.to_string()))?;
        info!(%asset, amount = %format_units(amount), "reserve withdrawal");
        Ok(())
    }

    /// Deposit `amount` of `asset` from the caller and grow the pool's total
    /// by the same amount. Open to any caller.
    ///
    /// Additive, in contrast to the destructive [`set_pool`](Self::set_pool).
    /// A first-time funding creates a zero pool stamped with `is_native`;
    /// the stamp of an existing pool is left alone. Returns the new total.
    ///
    /// # Errors
    ///
    /// [`EngineError::AmountOverflow`] if the total cannot grow (checked
    /// before any value is pulled); [`EngineError::TransferFailed`] if the
    /// caller cannot cover the deposit.
    pub fn fund_pool(
        &mut self,
        caller: Address,
        asset: AssetId,
        amount: Amount,
        is_native: bool,
    ) -> Result<Amount, EngineError> {
        let pool = self.pools.get(asset);
        let total = pool
            .total
            .checked_add(amount)
            .ok_or(EngineError::AmountOverflow)?;
        let staged = Pool {
            total,
            max_send: pool.max_send,
            is_native: if self.pools.contains(asset) {
                pool.is_native
            } else {
                is_native
            },
        };

        self.vault
            .transfer_in(asset, caller, amount)
            .map_err(|err| EngineError::TransferFailed(err.to_string()))?;
        self.pools.set(asset, staged);
        info!(
            %caller,
            %asset,
            amount = %format_units(amount),
            total = %format_units(total),
            "pool funded"
        );
        Ok(total)
    }

    /// Deposit `amount` of `asset` from the caller into the reserve only.
    /// Open to any caller. No pool's total changes.
    ///
    /// # Errors
    ///
    /// [`EngineError::TransferFailed`] if the caller cannot cover the
    /// deposit.
    pub fn top_up(
        &mut self,
        caller: Address,
        asset: AssetId,
        amount: Amount,
    ) -> Result<(), EngineError> {
        self.vault
            .transfer_in(asset, caller, amount)
            .map_err(|err| EngineError::TransferFailed(err.to_string()))?;
        debug!(%caller, %asset, amount = %format_units(amount), "reserve topped up");
        Ok(())
    }

    /// Move `amount` from the unallocated reserve into the pool's total.
    /// Admin only. No external transfer: this is a pure reclassification of
    /// holdings the engine already has. Returns the new total.
    ///
    /// # Errors
    ///
    /// [`EngineError::Unauthorized`];
    /// [`EngineError::InsufficientReserve`] if the reserve is short;
    /// [`EngineError::AmountOverflow`] if the total cannot grow.
    pub fn increase_pool(
        &mut self,
        caller: Address,
        asset: AssetId,
        amount: Amount,
    ) -> Result<Amount, EngineError> {
        self.require_admin(caller)?;
        let reserve = self.reserve(asset);
        if amount > reserve {
            return Err(EngineError::InsufficientReserve {
                have: reserve,
                need: amount,
            });
        }
        let total = self.pools.credit(asset, amount)?;
        info!(%asset, amount = %format_units(amount), total = %format_units(total), "pool increased from reserve");
        Ok(total)
    }

    fn require_admin(&self, caller: Address) -> Result<(), EngineError> {
        if !self.config.is_admin(caller) {
            warn!(%caller, "admin-only operation rejected");
            return Err(EngineError::Unauthorized);
        }
        Ok(())
    }
}

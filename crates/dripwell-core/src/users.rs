//! The user claim-state store: per-(user, asset) streak bookkeeping.
//!
//! Records are created lazily by the first successful claim and never
//! deleted. Reads are total: an account that has never claimed reads as the
//! zero-valued state. Only the engine's claim path writes here.

use std::collections::HashMap;

use crate::types::{Address, AssetId, UserClaimState};

/// Owned map from (user, asset) to claim state.
#[derive(Debug, Default, Clone)]
pub struct UserClaimStore {
    states: HashMap<(Address, AssetId), UserClaimState>,
}

impl UserClaimStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The claim state for `(user, asset)`; zero-valued if never claimed.
    pub fn get(&self, user: Address, asset: AssetId) -> UserClaimState {
        self.states.get(&(user, asset)).copied().unwrap_or_default()
    }

    /// Record the state produced by a successful claim.
    pub fn record(&mut self, user: Address, asset: AssetId, state: UserClaimState) {
        self.states.insert((user, asset), state);
    }
}

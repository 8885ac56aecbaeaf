//! Engine configuration.
//!
//! Everything here is fixed at construction time: there is no runtime
//! reconfiguration and no admin handover. Changing cadence or admin means
//! standing up a new engine.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_COOLDOWN_SECS, DEFAULT_DAY_LENGTH_SECS};
use crate::types::Address;

/// Construction-time configuration for a [`Engine`](crate::engine::Engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The single privileged principal.
    pub admin: Address,
    /// Minimum seconds between successful claims per (user, asset).
    pub cooldown_secs: u64,
    /// Seconds within which a follow-up claim continues the streak.
    pub day_length_secs: u64,
}

impl EngineConfig {
    /// Production cadence defaults (24 h cooldown, 48 h streak window) for
    /// the given admin.
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            day_length_secs: DEFAULT_DAY_LENGTH_SECS,
        }
    }

    /// Whether `caller` is the privileged admin.
    pub fn is_admin(&self, caller: Address) -> bool {
        caller == self.admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_production_cadence() {
        let cfg = EngineConfig::new(Address([1; 20]));
        assert_eq!(cfg.cooldown_secs, DEFAULT_COOLDOWN_SECS);
        assert_eq!(cfg.day_length_secs, DEFAULT_DAY_LENGTH_SECS);
    }

    #[test]
    fn is_admin_compares_exactly() {
        let cfg = EngineConfig::new(Address([1; 20]));
        assert!(cfg.is_admin(Address([1; 20])));
        assert!(!cfg.is_admin(Address([2; 20])));
        assert!(!cfg.is_admin(Address::ZERO));
    }
}

//! Error types for the Dripwell engine.
use thiserror::Error;

use crate::types::Amount;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseIdError {
    #[error("missing 0x prefix")] MissingPrefix,
    #[error("expected {expected} bytes, got {got}")] BadLength { expected: usize, got: usize },
    #[error("invalid hex: {0}")] InvalidHex(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("insufficient balance: have {have}, need {need}")] InsufficientBalance { have: Amount, need: Amount },
    #[error("transfer rejected: {0}")] Rejected(String),
    #[error("balance overflow")] BalanceOverflow,
}

/// Failure of a single engine operation.
///
/// Every error is terminal for the attempted operation and leaves engine
/// state exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("unauthorized: admin-only operation")] Unauthorized,
    // Message prefix is load-bearing: clients match on "Claim too soon".
    #[error("Claim too soon: retry in {retry_in_secs}s")] ClaimTooSoon { retry_in_secs: u64 },
    #[error("pool not configured: {0}")] PoolNotConfigured(String),
    #[error("pool exhausted: cap {cap} below minimum claim {min}")] PoolExhausted { cap: Amount, min: Amount },
    #[error("insufficient pool: have {have}, need {need}")] InsufficientPool { have: Amount, need: Amount },
    #[error("insufficient reserve: have {have}, need {need}")] InsufficientReserve { have: Amount, need: Amount },
    #[error("transfer failed: {0}")] TransferFailed(String),
    #[error("amount overflow")] AmountOverflow,
}

#[derive(Error, Debug)]
pub enum DripwellError {
    #[error(transparent)] Engine(#[from] EngineError),
    #[error(transparent)] Vault(#[from] VaultError),
    #[error(transparent)] Parse(#[from] ParseIdError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_too_soon_message_prefix() {
        let err = EngineError::ClaimTooSoon { retry_in_secs: 840 };
        assert!(err.to_string().starts_with("Claim too soon"));
        assert!(err.to_string().contains("840"));
    }

    #[test]
    fn insufficiency_messages_carry_amounts() {
        let err = EngineError::InsufficientPool { have: 5, need: 9 };
        assert_eq!(err.to_string(), "insufficient pool: have 5, need 9");
        let err = EngineError::InsufficientReserve { have: 0, need: 1 };
        assert_eq!(err.to_string(), "insufficient reserve: have 0, need 1");
    }

    #[test]
    fn umbrella_wraps_engine_errors() {
        let err: DripwellError = EngineError::Unauthorized.into();
        assert_eq!(err.to_string(), "unauthorized: admin-only operation");
    }
}

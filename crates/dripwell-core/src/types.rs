//! Core engine types: accounts, assets, pools, and per-user claim state.
//!
//! All monetary values are in base units (1 unit = 10^18 base units) and use
//! u128 so that wei-scale pool totals and their sums cannot overflow.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseIdError;

/// Monetary amount in an asset's smallest denomination.
pub type Amount = u128;

/// A 20-byte account identifier: a user, the admin, or a payout recipient.
///
/// Identities are opaque values handed in by the (out-of-scope) wallet layer;
/// no key material is handled here. Renders as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Create an address from a byte array.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(parse_hex20(s)?))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Identifier of a claimable asset: the native coin or one fungible token.
///
/// The native coin is the reserved all-zero identifier, distinct by
/// construction from every real token contract id. Renders as `native` or
/// `0x`-prefixed hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub [u8; 20]);

impl AssetId {
    /// The native-coin sentinel (all zero bytes).
    pub const NATIVE: Self = Self([0u8; 20]);

    /// Create a token asset id from a byte array.
    pub fn token(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Check if this is the native-coin sentinel.
    pub fn is_native(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            write!(f, "native")
        } else {
            write!(f, "0x{}", hex::encode(self.0))
        }
    }
}

impl FromStr for AssetId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "native" {
            return Ok(Self::NATIVE);
        }
        Ok(Self(parse_hex20(s)?))
    }
}

impl From<[u8; 20]> for AssetId {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl Serialize for AssetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a `0x`-prefixed 40-hex-digit string into 20 bytes.
fn parse_hex20(s: &str) -> Result<[u8; 20], ParseIdError> {
    let hex_part = s.strip_prefix("0x").ok_or(ParseIdError::MissingPrefix)?;
    let decoded = hex::decode(hex_part).map_err(|e| ParseIdError::InvalidHex(e.to_string()))?;
    if decoded.len() != 20 {
        return Err(ParseIdError::BadLength {
            expected: 20,
            got: decoded.len(),
        });
    }
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&decoded);
    Ok(bytes)
}

/// A claimable allocation of one asset.
///
/// Pools are never deleted; an unconfigured asset reads as the zero-valued
/// pool, and `max_send == 0` disables claiming.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Value currently allocated to this pool, available to claim or send.
    pub total: Amount,
    /// Per-claim ceiling before any streak bonus. Zero disables claiming.
    pub max_send: Amount,
    /// Whether payouts move native value rather than token value.
    pub is_native: bool,
}

impl Pool {
    /// A pool is claimable only once the admin has set a nonzero `max_send`.
    pub fn is_configured(&self) -> bool {
        self.max_send > 0
    }
}

/// Per-(user, asset) claim bookkeeping.
///
/// Created lazily on first claim; an account that has never claimed reads as
/// the zero-valued state (`last_claim == 0` is the "never claimed" sentinel).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaimState {
    /// Consecutive qualifying claims. Zero until the first claim.
    pub streak: u64,
    /// The streak-boosted, pool-capped bound the latest claim was drawn from.
    pub effective_max_send: Amount,
    /// Unix seconds of the latest successful claim; zero means never claimed.
    pub last_claim: u64,
}

impl UserClaimState {
    /// Check whether this account has ever claimed this asset.
    pub fn has_claimed(&self) -> bool {
        self.last_claim != 0
    }
}

/// Outcome of a successful claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    /// Amount actually paid out.
    pub amount: Amount,
    /// The claimant's streak after this claim.
    pub streak: u64,
    /// The bound the payout was drawn against (streak-boosted, pool-capped).
    pub effective_cap: Amount,
}

/// Outcome of a successful batch send: one payout per recipient, in the
/// caller-supplied order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReceipt {
    /// Per-recipient payouts, order preserved from the request.
    pub payouts: Vec<(Address, Amount)>,
    /// Sum of all payouts (the total debited from the pool).
    pub total: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(seed: u8) -> Address {
        Address([seed; 20])
    }

    // --- Address ---

    #[test]
    fn address_display_roundtrip() {
        let a = addr(0xab);
        let s = a.to_string();
        assert_eq!(s, format!("0x{}", "ab".repeat(20)));
        assert_eq!(s.parse::<Address>().unwrap(), a);
    }

    #[test]
    fn address_parse_rejects_bad_input() {
        assert_eq!(
            "abab".parse::<Address>().unwrap_err(),
            ParseIdError::MissingPrefix
        );
        assert!(matches!(
            "0xabcd".parse::<Address>().unwrap_err(),
            ParseIdError::BadLength { expected: 20, got: 2 }
        ));
        assert!(matches!(
            "0xzz".parse::<Address>().unwrap_err(),
            ParseIdError::InvalidHex(_)
        ));
    }

    #[test]
    fn address_serde_is_string_form() {
        let a = addr(0x01);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, format!("\"{a}\""));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }

    // --- AssetId ---

    #[test]
    fn native_sentinel_is_distinct_from_tokens() {
        assert!(AssetId::NATIVE.is_native());
        let token = AssetId::token([7u8; 20]);
        assert!(!token.is_native());
        assert_ne!(token, AssetId::NATIVE);
    }

    #[test]
    fn asset_display_roundtrip() {
        assert_eq!(AssetId::NATIVE.to_string(), "native");
        assert_eq!("native".parse::<AssetId>().unwrap(), AssetId::NATIVE);

        let token = AssetId::token([0x42; 20]);
        let s = token.to_string();
        assert!(s.starts_with("0x"));
        assert_eq!(s.parse::<AssetId>().unwrap(), token);
    }

    #[test]
    fn asset_serde_roundtrip() {
        let token = AssetId::token([9u8; 20]);
        let json = serde_json::to_string(&token).unwrap();
        let back: AssetId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);

        let native: AssetId = serde_json::from_str("\"native\"").unwrap();
        assert!(native.is_native());
    }

    // --- Pool / UserClaimState ---

    #[test]
    fn zero_pool_is_unconfigured() {
        let pool = Pool::default();
        assert_eq!(pool.total, 0);
        assert_eq!(pool.max_send, 0);
        assert!(!pool.is_native);
        assert!(!pool.is_configured());
    }

    #[test]
    fn fresh_user_state_is_zeroed() {
        let state = UserClaimState::default();
        assert_eq!(state.streak, 0);
        assert_eq!(state.effective_max_send, 0);
        assert_eq!(state.last_claim, 0);
        assert!(!state.has_claimed());
    }
}

//! # Core Domain Entities
//!
//! Primitive identifiers and enumerations shared by the store, the mempool
//! and the utility.
//!
//! ## Type Decisions
//!
//! - `Address`: `[u8; 20]`, derived from the first 20 bytes of SHA-256 over an
//!   Ed25519 public key.
//! - `BlockHeight`: `u64`. Absent heights (not paused, not unstaking) are
//!   modelled as `Option<BlockHeight>`, never with a magic value.
//! - Amounts: `U256` from `primitive-types`; every subtraction is checked.

use crate::errors::{AmountError, EnumParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use primitive_types::U256;

/// A 32-byte hash (transaction hash, block hash).
pub type Hash = [u8; 32];

/// A 20-byte account / actor address.
pub type Address = [u8; 20];

/// Raw bytes of an Ed25519 public key.
pub type PublicKeyBytes = [u8; 32];

/// Height of a block in the chain.
pub type BlockHeight = u64;

/// Byte length of an [`Address`].
pub const ADDRESS_LEN: usize = 20;

/// Byte length of an Ed25519 public key.
pub const PUBLIC_KEY_LEN: usize = 32;

// =============================================================================
// ACTORS
// =============================================================================

/// The kinds of staked network participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActorType {
    Application,
    Validator,
    Fisherman,
    ServiceNode,
}

impl ActorType {
    /// Every actor type, in a fixed order.
    pub const ALL: [ActorType; 4] = [
        ActorType::Application,
        ActorType::Validator,
        ActorType::Fisherman,
        ActorType::ServiceNode,
    ];

    /// Prefix used for this actor type's governance parameters.
    pub fn param_prefix(&self) -> &'static str {
        match self {
            ActorType::Application => "app",
            ActorType::Validator => "validator",
            ActorType::Fisherman => "fisherman",
            ActorType::ServiceNode => "servicer",
        }
    }

    /// Validators do not serve relay chains.
    pub fn serves_chains(&self) -> bool {
        !matches!(self, ActorType::Validator)
    }
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param_prefix())
    }
}

impl FromStr for ActorType {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActorType::ALL
            .into_iter()
            .find(|t| t.param_prefix() == s)
            .ok_or_else(|| EnumParseError::UnknownActorType(s.to_string()))
    }
}

/// Lifecycle status of an actor.
///
/// ```text
/// Staked ──Unstake──→ Unstaking ──sweep at unstaking height──→ Unstaked
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StakeStatus {
    Staked,
    Unstaking,
    Unstaked,
}

impl fmt::Display for StakeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StakeStatus::Staked => "staked",
            StakeStatus::Unstaking => "unstaking",
            StakeStatus::Unstaked => "unstaked",
        };
        f.write_str(name)
    }
}

// =============================================================================
// POOLS
// =============================================================================

/// Protocol-owned balances, distinct from user accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PoolName {
    FeeCollector,
    Dao,
    /// Holds the stake of every actor type.
    AppStake,
}

impl PoolName {
    pub const ALL: [PoolName; 3] = [PoolName::FeeCollector, PoolName::Dao, PoolName::AppStake];

    /// Human readable name used in genesis files and logs.
    pub fn friendly_name(&self) -> &'static str {
        match self {
            PoolName::FeeCollector => "fee_collector",
            PoolName::Dao => "dao",
            PoolName::AppStake => "app_stake_pool",
        }
    }
}

impl fmt::Display for PoolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.friendly_name())
    }
}

impl FromStr for PoolName {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PoolName::ALL
            .into_iter()
            .find(|p| p.friendly_name() == s)
            .ok_or_else(|| EnumParseError::UnknownPool(s.to_string()))
    }
}

// =============================================================================
// AMOUNTS
// =============================================================================

/// Parse a base-10, non-negative integer amount.
///
/// Leading `+`/`-` signs, whitespace and the empty string are rejected.
pub fn parse_amount(s: &str) -> Result<U256, AmountError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::InvalidFormat(s.to_string()));
    }
    U256::from_dec_str(s).map_err(|_| AmountError::Overflow)
}

/// `a + b`, failing instead of wrapping.
pub fn checked_add(a: U256, b: U256) -> Result<U256, AmountError> {
    a.checked_add(b).ok_or(AmountError::Overflow)
}

/// `a - b`, failing instead of going negative.
pub fn checked_sub(a: U256, b: U256) -> Result<U256, AmountError> {
    a.checked_sub(b).ok_or_else(|| AmountError::Underflow {
        minuend: a.to_string(),
        subtrahend: b.to_string(),
    })
}

/// Serde helper that writes amounts as decimal strings.
///
/// ```rust,ignore
/// #[serde(with = "shared_types::decimal_amount")]
/// pub staked_amount: U256,
/// ```
pub mod decimal_amount {
    use super::{parse_amount, U256};
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_amount(&s).map_err(D::Error::custom)
    }
}

// =============================================================================
// ADDRESSES
// =============================================================================

/// Lowercase hex rendering of an address.
pub fn address_hex(address: &Address) -> String {
    hex::encode(address)
}

/// Convert a byte slice into an [`Address`] if it has the right length.
pub fn address_from_slice(bytes: &[u8]) -> Option<Address> {
    bytes.try_into().ok()
}

/// Serde helper that writes fixed-size byte arrays (addresses, public keys)
/// as lowercase hex strings.
pub mod hex_array {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer, const N: usize>(
        value: &[u8; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<[u8; N], D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(D::Error::custom)?;
        let len = bytes.len();
        bytes
            .try_into()
            .map_err(|_| D::Error::custom(format!("expected {N} bytes, got {len}")))
    }
}

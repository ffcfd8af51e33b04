//! Records held by the ledger store.

use serde::{Deserialize, Serialize};
use shared_types::{
    decimal_amount, hex_array, ActorType, Address, BlockHeight, PublicKeyBytes, StakeStatus, U256,
};
use std::fmt;

/// A staked network participant, as of one height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub actor_type: ActorType,
    #[serde(with = "hex_array")]
    pub address: Address,
    #[serde(with = "hex_array")]
    pub public_key: PublicKeyBytes,
    /// Reward and refund destination.
    #[serde(with = "hex_array")]
    pub output_address: Address,
    #[serde(with = "decimal_amount")]
    pub staked_amount: U256,
    /// Relay chain identifiers. Always empty for validators.
    pub chains: Vec<String>,
    pub service_url: String,
    /// Relay allowance, applications only.
    #[serde(default, with = "optional_amount")]
    pub max_relays: Option<U256>,
    pub status: StakeStatus,
    #[serde(with = "height_sentinel")]
    pub paused_height: Option<BlockHeight>,
    #[serde(with = "height_sentinel")]
    pub unstaking_height: Option<BlockHeight>,
}

impl Actor {
    pub fn is_paused(&self) -> bool {
        self.paused_height.is_some()
    }
}

/// Fields an edit-stake may change. Everything else carries over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorUpdate {
    pub staked_amount: U256,
    pub chains: Vec<String>,
    pub service_url: String,
    pub max_relays: Option<U256>,
}

/// A governance parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamValue {
    Int(i64),
    Amount(#[serde(with = "decimal_amount")] U256),
    Text(String),
    Address(#[serde(with = "hex_array")] Address),
}

impl ParamValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_amount(&self) -> Option<U256> {
        match self {
            ParamValue::Amount(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            ParamValue::Address(v) => Some(*v),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::Int(_) => "int",
            ParamValue::Amount(_) => "amount",
            ParamValue::Text(_) => "text",
            ParamValue::Address(_) => "address",
        }
    }

    /// Whether both values are of the same variant.
    pub fn same_kind(&self, other: &ParamValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Amount(v) => write!(f, "{v}"),
            ParamValue::Text(v) => f.write_str(v),
            ParamValue::Address(v) => f.write_str(&hex::encode(v)),
        }
    }
}

/// Persists `Option<BlockHeight>` as a signed integer where `-1` means
/// "not set", keeping the column queryable with plain integer comparisons.
pub mod height_sentinel {
    use serde::{de::Error as _, ser::Error as _, Deserialize, Deserializer, Serializer};
    use shared_types::BlockHeight;

    pub const NOT_SET: i64 = -1;

    pub fn serialize<S: Serializer>(
        value: &Option<BlockHeight>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            None => serializer.serialize_i64(NOT_SET),
            Some(height) => {
                let height = i64::try_from(*height)
                    .map_err(|_| S::Error::custom(format!("height {height} out of range")))?;
                serializer.serialize_i64(height)
            }
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<BlockHeight>, D::Error> {
        match i64::deserialize(deserializer)? {
            NOT_SET => Ok(None),
            height if height >= 0 => Ok(Some(height as BlockHeight)),
            other => Err(D::Error::custom(format!("invalid height {other}"))),
        }
    }
}

mod optional_amount {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
    use shared_types::{parse_amount, U256};

    pub fn serialize<S: Serializer>(value: &Option<U256>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(amount) => serializer.serialize_some(&amount.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<U256>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| parse_amount(&s).map_err(D::Error::custom))
            .transpose()
    }
}

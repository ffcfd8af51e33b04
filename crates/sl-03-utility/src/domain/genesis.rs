//! Genesis state, loaded from JSON.

use crate::domain::params::GenesisParams;
use serde::{Deserialize, Serialize};
use shared_types::{decimal_amount, hex_array, Address, PoolName, U256};
use sl_01_persistence::Actor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAccount {
    #[serde(with = "hex_array")]
    pub address: Address,
    #[serde(with = "decimal_amount")]
    pub amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisPool {
    pub name: PoolName,
    #[serde(with = "decimal_amount")]
    pub amount: U256,
}

/// State written at height 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub accounts: Vec<GenesisAccount>,
    /// Pools not listed start at zero.
    #[serde(default)]
    pub pools: Vec<GenesisPool>,
    #[serde(default)]
    pub actors: Vec<Actor>,
    #[serde(default)]
    pub params: GenesisParams,
}

impl GenesisState {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

//! Shared fixtures for unit tests.

use crate::application::context::UtilityContext;
use crate::domain::genesis::{GenesisAccount, GenesisState};
use crate::domain::messages::Message;
use crate::domain::params::{self, GenesisParams};
use crate::domain::transaction::Transaction;
use shared_crypto::Ed25519KeyPair;
use shared_types::{ActorType, Address, U256};
use sl_01_persistence::{InMemoryLedger, ParamValue};

pub const FEE: u64 = 10;
pub const MIN_STAKE: u64 = 100;
pub const UNSTAKING_BLOCKS: i64 = 10;
pub const MIN_PAUSE_BLOCKS: i64 = 4;
pub const MAX_PAUSE_BLOCKS: i64 = 20;

pub fn key(seed: u8) -> Ed25519KeyPair {
    Ed25519KeyPair::from_seed([seed; 32])
}

/// Parameter owner used by every fixture store.
pub fn owner() -> Ed25519KeyPair {
    key(200)
}

pub fn test_params(owner: Address) -> GenesisParams {
    let mut params = GenesisParams::with_owner(owner);
    let fee_keys: Vec<String> = params
        .entries
        .keys()
        .filter(|k| k.starts_with("message_") && k.ends_with("_fee"))
        .cloned()
        .collect();
    for k in fee_keys {
        params.set(k, ParamValue::Amount(U256::from(FEE)));
    }
    for actor_type in ActorType::ALL {
        params.set(params::minimum_stake(actor_type), ParamValue::Amount(U256::from(MIN_STAKE)));
        params.set(params::unstaking_blocks(actor_type), ParamValue::Int(UNSTAKING_BLOCKS));
        params.set(params::minimum_pause_blocks(actor_type), ParamValue::Int(MIN_PAUSE_BLOCKS));
        params.set(params::max_pause_blocks(actor_type), ParamValue::Int(MAX_PAUSE_BLOCKS));
        if actor_type.serves_chains() {
            params.set(params::max_chains(actor_type), ParamValue::Int(2));
        }
    }
    params.set(params::DOUBLE_SIGN_BURN_PERCENTAGE, ParamValue::Int(10));
    params.set(params::APP_BASELINE_STAKE_RATE, ParamValue::Int(100));
    params.set(params::APP_STABILITY_ADJUSTMENT, ParamValue::Int(7));
    params
}

pub fn test_genesis(accounts: &[(Address, u64)]) -> GenesisState {
    GenesisState {
        accounts: accounts
            .iter()
            .map(|(address, amount)| GenesisAccount {
                address: *address,
                amount: U256::from(*amount),
            })
            .collect(),
        params: test_params(owner().address()),
        ..GenesisState::default()
    }
}

/// Store initialised at height 0 with the given funded accounts.
pub fn store_with(accounts: &[(Address, u64)]) -> InMemoryLedger {
    let mut store = InMemoryLedger::new();
    UtilityContext::new(&mut store, 0)
        .apply_genesis(&test_genesis(accounts))
        .unwrap();
    store
}

pub fn signed(message: &Message, signer: &Ed25519KeyPair, nonce: &str) -> Transaction {
    let mut tx = Transaction::new(message, nonce).unwrap();
    tx.sign(signer).unwrap();
    tx
}

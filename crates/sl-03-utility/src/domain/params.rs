//! Governance parameter names and genesis defaults.
//!
//! Every parameter `name` has a companion `name_owner` entry holding the
//! address allowed to change it. Owner entries are themselves owned by
//! [`ACL_OWNER`].

use crate::domain::messages::Message;
use serde::{Deserialize, Serialize};
use shared_types::{ActorType, Address, U256};
use sl_01_persistence::ParamValue;
use std::collections::BTreeMap;

pub const APP_BASELINE_STAKE_RATE: &str = "app_baseline_stake_rate";
pub const APP_STABILITY_ADJUSTMENT: &str = "app_stability_adjustment";
pub const VALIDATOR_MAX_EVIDENCE_AGE_IN_BLOCKS: &str = "validator_max_evidence_age_in_blocks";
pub const DOUBLE_SIGN_BURN_PERCENTAGE: &str = "double_sign_burn_percentage";

pub const MESSAGE_SEND_FEE: &str = "message_send_fee";
pub const MESSAGE_DOUBLE_SIGN_FEE: &str = "message_double_sign_fee";
pub const MESSAGE_CHANGE_PARAMETER_FEE: &str = "message_change_parameter_fee";

pub const ACL_OWNER: &str = "acl_owner";

const OWNER_SUFFIX: &str = "_owner";

pub fn minimum_stake(actor_type: ActorType) -> String {
    format!("{}_minimum_stake", actor_type.param_prefix())
}

/// Not defined for validators, which serve no chains.
pub fn max_chains(actor_type: ActorType) -> String {
    format!("{}_max_chains", actor_type.param_prefix())
}

pub fn unstaking_blocks(actor_type: ActorType) -> String {
    format!("{}_unstaking_blocks", actor_type.param_prefix())
}

pub fn minimum_pause_blocks(actor_type: ActorType) -> String {
    format!("{}_minimum_pause_blocks", actor_type.param_prefix())
}

pub fn max_pause_blocks(actor_type: ActorType) -> String {
    format!("{}_max_pause_blocks", actor_type.param_prefix())
}

/// Name of the fee parameter charged for `message`.
pub fn fee_key(message: &Message) -> String {
    match message {
        Message::Send(_) => MESSAGE_SEND_FEE.to_string(),
        Message::Stake(m) => format!("message_stake_{}_fee", m.actor_type.param_prefix()),
        Message::EditStake(m) => format!("message_edit_stake_{}_fee", m.actor_type.param_prefix()),
        Message::Unstake(m) => format!("message_unstake_{}_fee", m.actor_type.param_prefix()),
        Message::Unpause(m) => format!("message_unpause_{}_fee", m.actor_type.param_prefix()),
        Message::DoubleSign(_) => MESSAGE_DOUBLE_SIGN_FEE.to_string(),
        Message::ChangeParameter(_) => MESSAGE_CHANGE_PARAMETER_FEE.to_string(),
    }
}

/// Parameter holding the address allowed to change `name`.
pub fn owner_key(name: &str) -> String {
    if name == ACL_OWNER || name.ends_with(OWNER_SUFFIX) {
        ACL_OWNER.to_string()
    } else {
        format!("{name}{OWNER_SUFFIX}")
    }
}

/// The full parameter table written at genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenesisParams {
    pub entries: BTreeMap<String, ParamValue>,
}

impl Default for GenesisParams {
    fn default() -> Self {
        Self::with_owner([0u8; 20])
    }
}

impl GenesisParams {
    /// Default values with every parameter owned by `owner`.
    pub fn with_owner(owner: Address) -> Self {
        let mut entries = BTreeMap::new();
        let amount = |v: u64| ParamValue::Amount(U256::from(v));

        for actor_type in ActorType::ALL {
            let prefix = actor_type.param_prefix();
            entries.insert(minimum_stake(actor_type), amount(15_000_000_000));
            if actor_type.serves_chains() {
                entries.insert(max_chains(actor_type), ParamValue::Int(15));
            }
            let unstaking = if actor_type == ActorType::Validator { 5 } else { 2016 };
            entries.insert(unstaking_blocks(actor_type), ParamValue::Int(unstaking));
            entries.insert(minimum_pause_blocks(actor_type), ParamValue::Int(4));
            entries.insert(max_pause_blocks(actor_type), ParamValue::Int(672));

            entries.insert(format!("message_stake_{prefix}_fee"), amount(10_000));
            entries.insert(format!("message_edit_stake_{prefix}_fee"), amount(10_000));
            entries.insert(format!("message_unstake_{prefix}_fee"), amount(10_000));
            entries.insert(format!("message_unpause_{prefix}_fee"), amount(10_000));
        }

        entries.insert(APP_BASELINE_STAKE_RATE.into(), ParamValue::Int(100));
        entries.insert(APP_STABILITY_ADJUSTMENT.into(), ParamValue::Int(0));
        entries.insert(VALIDATOR_MAX_EVIDENCE_AGE_IN_BLOCKS.into(), ParamValue::Int(8));
        entries.insert(DOUBLE_SIGN_BURN_PERCENTAGE.into(), ParamValue::Int(5));
        entries.insert(MESSAGE_SEND_FEE.into(), amount(10_000));
        entries.insert(MESSAGE_DOUBLE_SIGN_FEE.into(), amount(10_000));
        entries.insert(MESSAGE_CHANGE_PARAMETER_FEE.into(), amount(10_000));

        let names: Vec<String> = entries.keys().cloned().collect();
        for name in names {
            entries.insert(owner_key(&name), ParamValue::Address(owner));
        }
        entries.insert(ACL_OWNER.into(), ParamValue::Address(owner));

        Self { entries }
    }

    /// Override one entry.
    pub fn set(&mut self, name: impl Into<String>, value: ParamValue) -> &mut Self {
        self.entries.insert(name.into(), value);
        self
    }
}

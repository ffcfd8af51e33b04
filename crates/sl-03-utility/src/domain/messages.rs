//! The seven message kinds a transaction can carry.
//!
//! Messages travel inside a [`MessageEnvelope`]: a kind tag plus the CBOR
//! encoding of the message body. The tag picks the Rust type to decode into,
//! so an unrecognised tag is rejected before any handler is chosen.

use crate::domain::errors::UtilityError;
use serde::{Deserialize, Serialize};
use shared_crypto::Ed25519PublicKey;
use shared_types::{parse_amount, ActorType, Address, BlockHeight, Hash, PublicKeyBytes};
use sl_01_persistence::ParamValue;
use std::fmt;

/// Kind tag carried by a [`MessageEnvelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Send,
    Stake,
    EditStake,
    Unstake,
    Unpause,
    DoubleSign,
    ChangeParameter,
}

impl MessageKind {
    pub const ALL: [MessageKind; 7] = [
        MessageKind::Send,
        MessageKind::Stake,
        MessageKind::EditStake,
        MessageKind::Unstake,
        MessageKind::Unpause,
        MessageKind::DoubleSign,
        MessageKind::ChangeParameter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Send => "send",
            MessageKind::Stake => "stake",
            MessageKind::EditStake => "edit_stake",
            MessageKind::Unstake => "unstake",
            MessageKind::Unpause => "unpause",
            MessageKind::DoubleSign => "double_sign",
            MessageKind::ChangeParameter => "change_parameter",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        MessageKind::ALL.into_iter().find(|k| k.as_str() == tag)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-describing wrapper around an encoded message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub kind: String,
    pub value: Vec<u8>,
}

// =============================================================================
// MESSAGE BODIES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSend {
    pub from_address: Address,
    pub to_address: Address,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStake {
    pub actor_type: ActorType,
    pub public_key: PublicKeyBytes,
    pub chains: Vec<String>,
    pub amount: String,
    pub service_url: String,
    pub output_address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEditStake {
    pub actor_type: ActorType,
    pub address: Address,
    pub chains: Vec<String>,
    pub amount: String,
    pub service_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageUnstake {
    pub actor_type: ActorType,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageUnpause {
    pub actor_type: ActorType,
    pub address: Address,
}

/// A consensus vote, as submitted in double-sign evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub public_key: PublicKeyBytes,
    pub height: BlockHeight,
    pub round: u32,
    pub vote_type: u32,
    pub block_hash: Hash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDoubleSign {
    pub vote_a: Vote,
    pub vote_b: Vote,
    pub reporter_address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageChangeParameter {
    pub parameter_key: String,
    /// CBOR encoding of a [`ParamValue`].
    pub parameter_value: Vec<u8>,
}

impl MessageChangeParameter {
    pub fn new(parameter_key: impl Into<String>, value: &ParamValue) -> Result<Self, UtilityError> {
        Ok(Self {
            parameter_key: parameter_key.into(),
            parameter_value: serde_cbor::to_vec(value)
                .map_err(|e| UtilityError::Decode(e.to_string()))?,
        })
    }

    pub fn decode_value(&self) -> Result<ParamValue, UtilityError> {
        serde_cbor::from_slice(&self.parameter_value)
            .map_err(|e| UtilityError::Decode(format!("parameter value: {e}")))
    }
}

// =============================================================================
// MESSAGE
// =============================================================================

/// A decoded message. Matching on this enum is exhaustive by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Send(MessageSend),
    Stake(MessageStake),
    EditStake(MessageEditStake),
    Unstake(MessageUnstake),
    Unpause(MessageUnpause),
    DoubleSign(MessageDoubleSign),
    ChangeParameter(MessageChangeParameter),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Send(_) => MessageKind::Send,
            Message::Stake(_) => MessageKind::Stake,
            Message::EditStake(_) => MessageKind::EditStake,
            Message::Unstake(_) => MessageKind::Unstake,
            Message::Unpause(_) => MessageKind::Unpause,
            Message::DoubleSign(_) => MessageKind::DoubleSign,
            Message::ChangeParameter(_) => MessageKind::ChangeParameter,
        }
    }

    /// Actor type the message acts on, for stake lifecycle messages.
    pub fn actor_type(&self) -> Option<ActorType> {
        match self {
            Message::Stake(m) => Some(m.actor_type),
            Message::EditStake(m) => Some(m.actor_type),
            Message::Unstake(m) => Some(m.actor_type),
            Message::Unpause(m) => Some(m.actor_type),
            Message::Send(_) | Message::DoubleSign(_) | Message::ChangeParameter(_) => None,
        }
    }

    /// The address receiving value or being acted on, if any.
    pub fn recipient(&self) -> Option<Address> {
        match self {
            Message::Send(m) => Some(m.to_address),
            Message::EditStake(m) => Some(m.address),
            Message::Unstake(m) => Some(m.address),
            Message::Unpause(m) => Some(m.address),
            Message::Stake(_) | Message::DoubleSign(_) | Message::ChangeParameter(_) => None,
        }
    }

    pub fn to_envelope(&self) -> Result<MessageEnvelope, UtilityError> {
        let value = match self {
            Message::Send(m) => serde_cbor::to_vec(m),
            Message::Stake(m) => serde_cbor::to_vec(m),
            Message::EditStake(m) => serde_cbor::to_vec(m),
            Message::Unstake(m) => serde_cbor::to_vec(m),
            Message::Unpause(m) => serde_cbor::to_vec(m),
            Message::DoubleSign(m) => serde_cbor::to_vec(m),
            Message::ChangeParameter(m) => serde_cbor::to_vec(m),
        }
        .map_err(|e| UtilityError::Decode(e.to_string()))?;

        Ok(MessageEnvelope {
            kind: self.kind().as_str().to_string(),
            value,
        })
    }

    pub fn from_envelope(envelope: &MessageEnvelope) -> Result<Self, UtilityError> {
        let kind = MessageKind::from_tag(&envelope.kind)
            .ok_or_else(|| UtilityError::UnknownMessageKind(envelope.kind.clone()))?;
        let bytes = envelope.value.as_slice();

        let message = match kind {
            MessageKind::Send => serde_cbor::from_slice(bytes).map(Message::Send),
            MessageKind::Stake => serde_cbor::from_slice(bytes).map(Message::Stake),
            MessageKind::EditStake => serde_cbor::from_slice(bytes).map(Message::EditStake),
            MessageKind::Unstake => serde_cbor::from_slice(bytes).map(Message::Unstake),
            MessageKind::Unpause => serde_cbor::from_slice(bytes).map(Message::Unpause),
            MessageKind::DoubleSign => serde_cbor::from_slice(bytes).map(Message::DoubleSign),
            MessageKind::ChangeParameter => {
                serde_cbor::from_slice(bytes).map(Message::ChangeParameter)
            }
        };
        message.map_err(|e| UtilityError::Decode(format!("{kind} message: {e}")))
    }

    /// Stateless structural checks.
    pub fn validate_basic(&self) -> Result<(), UtilityError> {
        match self {
            Message::Send(m) => {
                parse_amount(&m.amount)?;
            }
            Message::Stake(m) => {
                Ed25519PublicKey::from_bytes(m.public_key)
                    .map_err(|e| UtilityError::InvalidPublicKey(e.to_string()))?;
                parse_amount(&m.amount)?;
                validate_relay_chains(m.actor_type, &m.chains)?;
                validate_service_url(m.actor_type, &m.service_url)?;
            }
            Message::EditStake(m) => {
                parse_amount(&m.amount)?;
                validate_relay_chains(m.actor_type, &m.chains)?;
                validate_service_url(m.actor_type, &m.service_url)?;
            }
            Message::Unstake(_) | Message::Unpause(_) => {}
            Message::DoubleSign(m) => validate_evidence(&m.vote_a, &m.vote_b)?,
            Message::ChangeParameter(m) => {
                if m.parameter_key.is_empty() {
                    return Err(UtilityError::Validation("empty parameter key".into()));
                }
                m.decode_value()?;
            }
        }
        Ok(())
    }
}

/// Relay chain identifiers are four hex characters.
fn validate_relay_chains(actor_type: ActorType, chains: &[String]) -> Result<(), UtilityError> {
    if !actor_type.serves_chains() {
        // Validators carry no chains; the handler reports the count
        return Ok(());
    }
    for chain in chains {
        if chain.len() != 4 || !chain.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(UtilityError::Validation(format!("invalid relay chain {chain:?}")));
        }
    }
    Ok(())
}

/// Service URLs need an http(s) scheme, a host and a numeric port.
/// Applications do not serve and may leave it empty.
fn validate_service_url(actor_type: ActorType, url: &str) -> Result<(), UtilityError> {
    if actor_type == ActorType::Application && url.is_empty() {
        return Ok(());
    }
    let invalid = || UtilityError::Validation(format!("invalid service url {url:?}"));

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(invalid)?;
    let authority = rest.split('/').next().unwrap_or_default();
    let (host, port) = authority.rsplit_once(':').ok_or_else(invalid)?;
    if host.is_empty() || port.parse::<u16>().is_err() {
        return Err(invalid());
    }
    Ok(())
}

/// Two votes prove a double sign when they come from the same key for the
/// same height, round and type, but for different blocks.
fn validate_evidence(a: &Vote, b: &Vote) -> Result<(), UtilityError> {
    Ed25519PublicKey::from_bytes(a.public_key)
        .map_err(|e| UtilityError::InvalidPublicKey(e.to_string()))?;

    if a.public_key != b.public_key {
        return Err(UtilityError::Validation("evidence votes from different keys".into()));
    }
    if a.height != b.height || a.round != b.round || a.vote_type != b.vote_type {
        return Err(UtilityError::Validation(
            "evidence votes for different height, round or type".into(),
        ));
    }
    if a.block_hash == b.block_hash {
        return Err(UtilityError::Validation("evidence votes for the same block".into()));
    }
    Ok(())
}

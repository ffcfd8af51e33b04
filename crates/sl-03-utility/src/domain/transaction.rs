//! Transaction envelope and codec.
//!
//! Transactions are CBOR maps keyed by field name. The dedup hash is taken
//! over the bytes exactly as received, so only the canonical encoding is
//! accepted: a signed transaction has exactly one hash.

use crate::domain::errors::UtilityError;
use crate::domain::messages::{Message, MessageEnvelope};
use serde::{Deserialize, Serialize};
use shared_crypto::{transaction_hash, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
use shared_types::Hash;

/// Signature over a transaction's sign bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxSignature {
    pub public_key: Vec<u8>,
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub msg: MessageEnvelope,
    pub signature: Option<TxSignature>,
    /// Caller-chosen uniqueness salt, so identical messages hash differently.
    pub nonce: String,
}

impl Transaction {
    /// Unsigned transaction carrying `message`.
    pub fn new(message: &Message, nonce: impl Into<String>) -> Result<Self, UtilityError> {
        Ok(Self {
            msg: message.to_envelope()?,
            signature: None,
            nonce: nonce.into(),
        })
    }

    /// Decode `raw`, rejecting any encoding other than the one
    /// [`Transaction::encode`] produces (extra keys, reordered fields,
    /// non-minimal integers).
    pub fn decode(raw: &[u8]) -> Result<Self, UtilityError> {
        let tx: Self =
            serde_cbor::from_slice(raw).map_err(|e| UtilityError::Decode(e.to_string()))?;
        if tx.encode()? != raw {
            return Err(UtilityError::Decode("non-canonical transaction encoding".into()));
        }
        Ok(tx)
    }

    pub fn encode(&self) -> Result<Vec<u8>, UtilityError> {
        serde_cbor::to_vec(self).map_err(|e| UtilityError::Decode(e.to_string()))
    }

    /// Hash of this transaction's canonical encoding, equal to the hash of
    /// any bytes [`Transaction::decode`] accepted for it.
    pub fn hash(&self) -> Result<Hash, UtilityError> {
        Ok(transaction_hash(&self.encode()?))
    }

    /// Bytes covered by the signature: the encoding with no signature.
    pub fn sign_bytes(&self) -> Result<Vec<u8>, UtilityError> {
        let unsigned = Transaction {
            msg: self.msg.clone(),
            signature: None,
            nonce: self.nonce.clone(),
        };
        unsigned.encode()
    }

    pub fn sign(&mut self, key_pair: &Ed25519KeyPair) -> Result<(), UtilityError> {
        let signature = key_pair.sign(&self.sign_bytes()?);
        self.signature = Some(TxSignature {
            public_key: key_pair.public_key().as_bytes().to_vec(),
            signature: signature.as_bytes().to_vec(),
        });
        Ok(())
    }

    /// The embedded message.
    pub fn message(&self) -> Result<Message, UtilityError> {
        Message::from_envelope(&self.msg)
    }

    /// Public key declared in the signature.
    pub fn signer_public_key(&self) -> Result<Ed25519PublicKey, UtilityError> {
        let signature = self
            .signature
            .as_ref()
            .ok_or_else(|| UtilityError::Validation("missing signature".into()))?;
        Ed25519PublicKey::from_slice(&signature.public_key)
            .map_err(|e| UtilityError::InvalidPublicKey(e.to_string()))
    }

    /// Stateless checks run at admission and again before application.
    pub fn validate_basic(&self) -> Result<(), UtilityError> {
        if self.nonce.is_empty() {
            return Err(UtilityError::Validation("empty nonce".into()));
        }

        let public_key = self.signer_public_key()?;
        let raw_signature = self
            .signature
            .as_ref()
            .map(|s| s.signature.as_slice())
            .unwrap_or_default();
        let signature =
            Ed25519Signature::from_slice(raw_signature).map_err(|_| UtilityError::InvalidSignature)?;
        public_key
            .verify(&self.sign_bytes()?, &signature)
            .map_err(|_| UtilityError::InvalidSignature)?;

        self.message()?.validate_basic()
    }
}

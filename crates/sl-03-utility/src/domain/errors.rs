//! Utility error types.
//!
//! One enum covers admission, ante-handle and handler failures. Every
//! variant has a stable numeric code that is recorded in the transaction
//! result; `0` is reserved for success.

use shared_types::{AmountError, BlockHeight, StakeStatus};
use sl_01_persistence::StoreError;
use sl_02_mempool::MempoolError;
use thiserror::Error;

/// Result code of a successfully applied transaction.
pub const CODE_OK: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UtilityError {
    // =========================================================================
    // ADMISSION
    // =========================================================================
    #[error("Transaction already in the mempool")]
    DuplicateTransaction,

    #[error("Transaction already committed")]
    AlreadyCommitted,

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Mempool rejected transaction: {0}")]
    Mempool(MempoolError),

    // =========================================================================
    // ANTE-HANDLE
    // =========================================================================
    #[error("Unknown message kind: {0}")]
    UnknownMessageKind(String),

    #[error("No fee configured: {0}")]
    FeeNotConfigured(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Account lookup failed: {0}")]
    AccountLookup(StoreError),

    #[error("Insufficient funds in {holder}")]
    InsufficientFunds { holder: String },

    #[error("Signer is not authorized for this message")]
    InvalidSigner,

    // =========================================================================
    // HANDLERS
    // =========================================================================
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("Actor already exists")]
    AlreadyExists,

    #[error("Actor does not exist")]
    NotExists,

    #[error("Invalid status: expected {expected}, actual {actual}")]
    InvalidStatus {
        expected: StakeStatus,
        actual: StakeStatus,
    },

    #[error("Actor is not paused")]
    NotPaused,

    #[error("Not ready to unpause: paused at {paused_height}, needs {minimum_pause_blocks} blocks, now {height}")]
    NotReadyToUnpause {
        paused_height: BlockHeight,
        minimum_pause_blocks: u64,
        height: BlockHeight,
    },

    #[error("Evidence age {age} exceeds maximum {max}")]
    MaxEvidenceAgeExceeded { age: u64, max: u64 },

    #[error("Stake decreased: current {current}, requested {requested}")]
    StakeDecreased { current: String, requested: String },

    #[error("Stake {amount} below minimum {minimum}")]
    BelowMinimumStake { amount: String, minimum: String },

    #[error("{count} chains exceed maximum of {max}")]
    MaxChainsExceeded { count: usize, max: usize },

    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    #[error("Parameter {name} type mismatch: expected {expected}, got {actual}")]
    ParameterTypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    // =========================================================================
    // COLLABORATORS
    // =========================================================================
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl UtilityError {
    /// Stable result code.
    pub fn code(&self) -> u32 {
        match self {
            UtilityError::DuplicateTransaction => 1,
            UtilityError::AlreadyCommitted => 2,
            UtilityError::Decode(_) => 3,
            UtilityError::Validation(_) => 4,
            UtilityError::InsufficientFunds { .. } => 5,
            UtilityError::InvalidSigner => 6,
            UtilityError::AlreadyExists => 7,
            UtilityError::NotExists => 8,
            UtilityError::InvalidStatus { .. } => 9,
            UtilityError::NotPaused => 10,
            UtilityError::NotReadyToUnpause { .. } => 11,
            UtilityError::MaxEvidenceAgeExceeded { .. } => 12,
            UtilityError::UnknownMessageKind(_) => 13,
            UtilityError::Store(_) => 14,
            UtilityError::InvalidPublicKey(_) => 15,
            UtilityError::AccountLookup(_) => 16,
            UtilityError::FeeNotConfigured(_) => 17,
            UtilityError::StakeDecreased { .. } => 18,
            UtilityError::BelowMinimumStake { .. } => 19,
            UtilityError::MaxChainsExceeded { .. } => 20,
            UtilityError::ParameterTypeMismatch { .. } => 21,
            UtilityError::ParameterNotFound(_) => 22,
            UtilityError::InvalidAmount(_) => 23,
            UtilityError::InvalidSignature => 24,
            UtilityError::Mempool(_) => 25,
        }
    }

    /// Whether this error invalidates the whole block attempt.
    ///
    /// Store failures other than "not found" leave state undefined; a
    /// "not found" that escapes as `Store` is still only a transaction
    /// failure.
    pub fn is_fatal(&self) -> bool {
        match self {
            UtilityError::Store(err) => !err.is_not_found(),
            UtilityError::AccountLookup(_) => true,
            _ => false,
        }
    }

    /// Short label used in metrics.
    pub fn label(&self) -> &'static str {
        match self {
            UtilityError::DuplicateTransaction => "duplicate",
            UtilityError::AlreadyCommitted => "committed",
            UtilityError::Decode(_) | UtilityError::UnknownMessageKind(_) => "decode",
            UtilityError::Validation(_)
            | UtilityError::InvalidPublicKey(_)
            | UtilityError::InvalidSignature
            | UtilityError::InvalidAmount(_) => "validation",
            UtilityError::Mempool(_) => "mempool",
            UtilityError::Store(_) | UtilityError::AccountLookup(_) => "store",
            _ => "rejected",
        }
    }
}

impl From<MempoolError> for UtilityError {
    fn from(err: MempoolError) -> Self {
        match err {
            MempoolError::DuplicateTransaction(_) => UtilityError::DuplicateTransaction,
            other => UtilityError::Mempool(other),
        }
    }
}

//! Mempool error types.

use shared_types::Hash;
use thiserror::Error;

/// Mempool error type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MempoolError {
    /// Transaction already exists in the pool.
    #[error("Duplicate transaction: {}", hex::encode(.0))]
    DuplicateTransaction(Hash),

    /// Transaction is larger than a single entry may be.
    #[error("Transaction of {size} bytes exceeds limit of {max}")]
    TransactionTooLarge { size: usize, max: usize },

    #[error("Empty transaction")]
    EmptyTransaction,

    #[error("Transaction not found: {}", hex::encode(.0))]
    TransactionNotFound(Hash),
}

//! # Inbound Port - MempoolApi
//!
//! Driving port used by the utility's admission check and by block
//! application.

use crate::domain::MempoolError;
use shared_types::Hash;

/// Primary API for the transaction pool.
///
/// # Example
///
/// ```rust,ignore
/// use sl_02_mempool::{MempoolApi, MempoolConfig, TransactionPool};
///
/// let mut pool = TransactionPool::new(MempoolConfig::default());
/// let hash = pool.add_transaction(raw_bytes)?;
/// assert!(pool.contains(&hash));
///
/// // Block proposer takes the oldest transactions first
/// let batch = pool.reap_transactions(100, 1_000_000);
/// ```
pub trait MempoolApi {
    /// Whether a transaction with this hash is pooled.
    fn contains(&self, hash: &Hash) -> bool;

    /// Pool raw transaction bytes, returning their hash.
    ///
    /// # Errors
    /// - `DuplicateTransaction`: the same bytes are already pooled
    /// - `TransactionTooLarge`: over `max_transaction_bytes`
    /// - `EmptyTransaction`: zero-length input
    fn add_transaction(&mut self, raw: Vec<u8>) -> Result<Hash, MempoolError>;

    /// Drop a transaction, typically after its block committed.
    fn remove_transaction(&mut self, hash: &Hash) -> Result<Vec<u8>, MempoolError>;

    /// Oldest transactions first, bounded by count and total bytes.
    fn reap_transactions(&self, max_count: usize, max_bytes: usize) -> Vec<Vec<u8>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

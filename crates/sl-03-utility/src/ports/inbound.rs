//! # Inbound Port - UtilityApi
//!
//! Driving port used by the node: admission of submitted transactions and
//! application of decided blocks.

use crate::domain::{TxResult, UtilityError};
use shared_types::{BlockHeight, Hash};

/// Primary API of the utility.
///
/// # Example
///
/// ```rust,ignore
/// use sl_03_utility::{UtilityApi, UtilityService};
///
/// // Client submission
/// let hash = utility.check_transaction(raw_tx)?;
///
/// // Proposer
/// let txs = utility.reap_block_transactions();
///
/// // Every node, once the block is decided
/// let results = utility.apply_block(height, &txs)?;
/// ```
pub trait UtilityApi {
    /// Admission check: dedup against mempool and store, decode, validate,
    /// then pool the bytes.
    ///
    /// # Errors
    /// - `DuplicateTransaction`: already pooled
    /// - `AlreadyCommitted`: already in a committed block
    /// - `Decode` / `Validation` / signature errors: malformed transaction
    fn check_transaction(&mut self, raw: Vec<u8>) -> Result<Hash, UtilityError>;

    /// Pooled transactions for the next proposal, oldest first.
    fn reap_block_transactions(&self) -> Vec<Vec<u8>>;

    /// Apply a block's transactions in order, then run the end-of-block
    /// sweeps.
    ///
    /// Per-transaction failures are recorded in the results. An `Err`
    /// means a fatal store failure: nothing of the block was kept.
    fn apply_block(
        &mut self,
        height: BlockHeight,
        transactions: &[Vec<u8>],
    ) -> Result<Vec<TxResult>, UtilityError>;
}

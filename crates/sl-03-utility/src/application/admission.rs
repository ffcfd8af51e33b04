//! Admission check run before a transaction enters the mempool.

use crate::domain::errors::UtilityError;
use crate::domain::transaction::Transaction;
use shared_crypto::transaction_hash;
use shared_types::Hash;
use sl_01_persistence::LedgerStore;
use sl_02_mempool::MempoolApi;

/// Dedup, decode, validate, pool. Cheap checks run first.
pub fn check_transaction<S: LedgerStore, M: MempoolApi>(
    store: &S,
    mempool: &mut M,
    raw: Vec<u8>,
) -> Result<Hash, UtilityError> {
    // In memory?
    let hash = transaction_hash(&raw);
    if mempool.contains(&hash) {
        return Err(UtilityError::DuplicateTransaction);
    }

    // On disk?
    if store.transaction_exists(&hash)? {
        return Err(UtilityError::AlreadyCommitted);
    }

    let tx = Transaction::decode(&raw)?;
    tx.validate_basic()?;

    Ok(mempool.add_transaction(raw)?)
}

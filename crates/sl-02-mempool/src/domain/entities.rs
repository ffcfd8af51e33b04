//! Mempool entities and configuration.

use serde::{Deserialize, Serialize};
use shared_types::Hash;

/// A raw transaction waiting for inclusion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PooledTransaction {
    /// SHA3-256 of `raw`.
    pub hash: Hash,
    /// Bytes exactly as received.
    pub raw: Vec<u8>,
    /// Arrival order.
    pub sequence: u64,
}

impl PooledTransaction {
    pub fn size(&self) -> usize {
        self.raw.len()
    }
}

/// Mempool configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MempoolConfig {
    /// Maximum transactions in the pool.
    pub max_transactions: usize,
    /// Maximum size of one transaction in bytes.
    pub max_transaction_bytes: usize,
    /// Maximum size of all pooled transactions in bytes.
    pub max_total_bytes: usize,
}

impl Default for MempoolConfig {
    fn default() -> Self {
        Self {
            max_transactions: 9_000,
            max_transaction_bytes: 1024 * 1024,   // 1 MiB
            max_total_bytes: 1024 * 1024 * 1024,  // 1 GiB
        }
    }
}

impl MempoolConfig {
    /// Creates a minimal config for testing.
    pub fn for_testing() -> Self {
        Self {
            max_transactions: 4,
            max_transaction_bytes: 256,
            max_total_bytes: 512,
        }
    }
}

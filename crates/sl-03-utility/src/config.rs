//! Configuration for the utility service.

use serde::{Deserialize, Serialize};
use sl_02_mempool::MempoolConfig;
use std::env;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilityConfig {
    /// Limits of the admission pool.
    pub mempool: MempoolConfig,
    /// Maximum transactions reaped into one proposed block.
    pub max_block_transactions: usize,
    /// Maximum total bytes reaped into one proposed block.
    pub max_block_bytes: usize,
}

impl Default for UtilityConfig {
    fn default() -> Self {
        Self {
            mempool: MempoolConfig::default(),
            max_block_transactions: 1_000,
            max_block_bytes: 4 * 1024 * 1024, // 4 MiB
        }
    }
}

impl UtilityConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SL_MEMPOOL_MAX_TXS`: Maximum pooled transactions
    /// - `SL_MEMPOOL_MAX_TX_BYTES`: Maximum size of one transaction
    /// - `SL_MEMPOOL_MAX_BYTES`: Maximum size of the whole pool
    /// - `SL_BLOCK_MAX_TXS`: Maximum transactions per proposed block
    /// - `SL_BLOCK_MAX_BYTES`: Maximum bytes per proposed block
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            mempool: MempoolConfig {
                max_transactions: env_usize(
                    "SL_MEMPOOL_MAX_TXS",
                    defaults.mempool.max_transactions,
                ),
                max_transaction_bytes: env_usize(
                    "SL_MEMPOOL_MAX_TX_BYTES",
                    defaults.mempool.max_transaction_bytes,
                ),
                max_total_bytes: env_usize("SL_MEMPOOL_MAX_BYTES", defaults.mempool.max_total_bytes),
            },
            max_block_transactions: env_usize("SL_BLOCK_MAX_TXS", defaults.max_block_transactions),
            max_block_bytes: env_usize("SL_BLOCK_MAX_BYTES", defaults.max_block_bytes),
        }
    }
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

//! FIFO transaction pool.

use super::entities::{MempoolConfig, PooledTransaction};
use super::errors::MempoolError;
use crate::ports::MempoolApi;
use shared_crypto::transaction_hash;
use shared_types::Hash;
use sl_telemetry::{MEMPOOL_BYTES, MEMPOOL_SIZE};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Hash-keyed pool that reaps in arrival order.
#[derive(Debug)]
pub struct TransactionPool {
    config: MempoolConfig,
    /// Primary storage.
    by_hash: HashMap<Hash, PooledTransaction>,
    /// Arrival sequence to hash; the first entry is the oldest.
    order: BTreeMap<u64, Hash>,
    next_sequence: u64,
    total_bytes: usize,
}

impl TransactionPool {
    pub fn new(config: MempoolConfig) -> Self {
        Self {
            config,
            by_hash: HashMap::new(),
            order: BTreeMap::new(),
            next_sequence: 0,
            total_bytes: 0,
        }
    }

    pub fn config(&self) -> &MempoolConfig {
        &self.config
    }

    /// Total size of pooled transactions in bytes.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn get(&self, hash: &Hash) -> Option<&PooledTransaction> {
        self.by_hash.get(hash)
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.by_hash.clear();
        self.order.clear();
        self.total_bytes = 0;
        self.update_gauges();
    }

    fn evict_oldest(&mut self) -> Option<PooledTransaction> {
        let (_, hash) = self.order.pop_first()?;
        let evicted = self.by_hash.remove(&hash)?;
        self.total_bytes -= evicted.size();
        Some(evicted)
    }

    fn update_gauges(&self) {
        MEMPOOL_SIZE.set(self.by_hash.len() as f64);
        MEMPOOL_BYTES.set(self.total_bytes as f64);
    }
}

impl Default for TransactionPool {
    fn default() -> Self {
        Self::new(MempoolConfig::default())
    }
}

impl MempoolApi for TransactionPool {
    fn contains(&self, hash: &Hash) -> bool {
        self.by_hash.contains_key(hash)
    }

    fn add_transaction(&mut self, raw: Vec<u8>) -> Result<Hash, MempoolError> {
        if raw.is_empty() {
            return Err(MempoolError::EmptyTransaction);
        }
        if raw.len() > self.config.max_transaction_bytes {
            return Err(MempoolError::TransactionTooLarge {
                size: raw.len(),
                max: self.config.max_transaction_bytes,
            });
        }

        let hash = transaction_hash(&raw);
        if self.by_hash.contains_key(&hash) {
            return Err(MempoolError::DuplicateTransaction(hash));
        }

        while self.by_hash.len() >= self.config.max_transactions
            || self.total_bytes + raw.len() > self.config.max_total_bytes
        {
            match self.evict_oldest() {
                Some(evicted) => warn!(
                    tx_hash = %hex::encode(evicted.hash),
                    "Mempool full, evicted oldest transaction"
                ),
                None => break,
            }
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.total_bytes += raw.len();
        self.order.insert(sequence, hash);
        self.by_hash.insert(
            hash,
            PooledTransaction {
                hash,
                raw,
                sequence,
            },
        );
        self.update_gauges();

        debug!(tx_hash = %hex::encode(hash), pending = self.by_hash.len(), "Transaction pooled");
        Ok(hash)
    }

    fn remove_transaction(&mut self, hash: &Hash) -> Result<Vec<u8>, MempoolError> {
        let tx = self
            .by_hash
            .remove(hash)
            .ok_or(MempoolError::TransactionNotFound(*hash))?;
        self.order.remove(&tx.sequence);
        self.total_bytes -= tx.size();
        self.update_gauges();
        Ok(tx.raw)
    }

    fn reap_transactions(&self, max_count: usize, max_bytes: usize) -> Vec<Vec<u8>> {
        let mut bytes = 0;
        let mut reaped = Vec::new();
        for hash in self.order.values() {
            if reaped.len() >= max_count {
                break;
            }
            let Some(tx) = self.by_hash.get(hash) else {
                continue;
            };
            if bytes + tx.size() > max_bytes {
                break;
            }
            bytes += tx.size();
            reaped.push(tx.raw.clone());
        }
        reaped
    }

    fn len(&self) -> usize {
        self.by_hash.len()
    }
}

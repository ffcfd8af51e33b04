//! Utility Service
//!
//! Main service implementing UtilityApi.
//!
//! Orchestrates block application:
//! 1. Take a block savepoint
//! 2. Apply each transaction (decode, ante-handle, dispatch)
//! 3. Index every included hash
//! 4. Run the end-of-block lifecycle sweeps
//! 5. Release the savepoint, or roll the whole block back on a fatal error

use crate::application::admission;
use crate::application::context::UtilityContext;
use crate::application::dispatcher::{MessageDispatch, MessageDispatcher};
use crate::config::UtilityConfig;
use crate::domain::errors::UtilityError;
use crate::domain::genesis::GenesisState;
use crate::domain::results::TxResult;
use crate::domain::transaction::Transaction;
use crate::ports::inbound::UtilityApi;
use shared_crypto::transaction_hash;
use shared_types::{BlockHeight, Hash};
use sl_01_persistence::LedgerStore;
use sl_02_mempool::{MempoolApi, MempoolError};
use sl_telemetry::{
    log_tx_event, HistogramTimer, BLOCK_APPLY_DURATION, TRANSACTIONS_APPLIED,
    TRANSACTIONS_CHECKED,
};
use tracing::{debug, error, info, warn};

/// Utility Service
///
/// Owns the store and the mempool. One block is applied at a time; the
/// `&mut self` receiver is the per-height lock.
pub struct UtilityService<S, M, D = MessageDispatcher> {
    store: S,
    mempool: M,
    dispatcher: D,
    config: UtilityConfig,
}

impl<S: LedgerStore, M: MempoolApi> UtilityService<S, M, MessageDispatcher> {
    /// Create a new service with default config
    pub fn new(store: S, mempool: M) -> Self {
        Self::with_config(store, mempool, UtilityConfig::default())
    }

    /// Create a new service with custom config
    pub fn with_config(store: S, mempool: M, config: UtilityConfig) -> Self {
        Self::with_dispatcher(store, mempool, MessageDispatcher, config)
    }
}

impl<S: LedgerStore, M: MempoolApi, D: MessageDispatch> UtilityService<S, M, D> {
    pub fn with_dispatcher(store: S, mempool: M, dispatcher: D, config: UtilityConfig) -> Self {
        Self {
            store,
            mempool,
            dispatcher,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn mempool(&self) -> &M {
        &self.mempool
    }

    pub fn config(&self) -> &UtilityConfig {
        &self.config
    }

    /// Execution context at `height`, for collaborators such as the
    /// missed-block logic that pauses actors.
    pub fn context(&mut self, height: BlockHeight) -> UtilityContext<'_, S> {
        UtilityContext::new(&mut self.store, height)
    }

    /// Write the genesis state at height 0.
    pub fn init_genesis(&mut self, genesis: &GenesisState) -> Result<(), UtilityError> {
        UtilityContext::new(&mut self.store, 0).apply_genesis(genesis)
    }

    /// Apply one transaction at `height`.
    ///
    /// Returns `Ok` with a failed result for ordinary rejections; `Err` only
    /// for fatal store failures. The hash is indexed either way.
    pub fn apply_transaction(
        &mut self,
        height: BlockHeight,
        index: u32,
        raw: &[u8],
    ) -> Result<TxResult, UtilityError> {
        let hash = transaction_hash(raw);
        let tx_hash = hex::encode(hash);
        let pending = TxResult::new(height, index, hash);

        if self.store.transaction_exists(&hash)? {
            return Ok(record(pending, Err(UtilityError::AlreadyCommitted)));
        }

        let result = match self.execute(height, raw, pending) {
            Ok(result) => record(result, Ok(())),
            Err((result, err)) if !err.is_fatal() => record(result, Err(err)),
            Err((_, err)) => {
                error!(height, tx_hash = %tx_hash, error = %err, "Store failure applying transaction");
                return Err(err);
            }
        };

        self.store.index_transaction(hash, height)?;
        log_tx_event!(debug, "Transaction applied", height, tx_hash, code = result.code);
        Ok(result)
    }

    /// Decode, ante-handle, dispatch. The error side carries whatever the
    /// result learned before the failure.
    fn execute(
        &mut self,
        height: BlockHeight,
        raw: &[u8],
        result: TxResult,
    ) -> Result<TxResult, (TxResult, UtilityError)> {
        // 1. Decode; no fee is charged for bytes that never authenticate
        let tx = match Transaction::decode(raw).and_then(|tx| tx.validate_basic().map(|_| tx)) {
            Ok(tx) => tx,
            Err(err) => return Err((result, err)),
        };
        let result = match tx.message() {
            Ok(message) => result.with_message(message.kind(), None, message.recipient()),
            Err(err) => return Err((result, err)),
        };

        let mut ctx = UtilityContext::new(&mut self.store, height);

        // 2. Ante-handle in its own savepoint
        ctx.store.begin_savepoint();
        let authorized = match ctx.ante_handle(&tx) {
            Ok(authorized) => authorized,
            Err(err) => return Err(rollback(ctx.store, result, err)),
        };
        if let Err(err) = ctx.store.release_savepoint() {
            return Err((result, err.into()));
        }
        let result = result.with_message(
            authorized.message.kind(),
            Some(authorized.signer),
            authorized.message.recipient(),
        );

        // 3. Handler in a nested savepoint; the fee survives its failure
        ctx.store.begin_savepoint();
        if let Err(err) = self.dispatcher.dispatch(&mut ctx, &authorized) {
            return Err(rollback(ctx.store, result, err));
        }
        if let Err(err) = ctx.store.release_savepoint() {
            return Err((result, err.into()));
        }

        debug!(
            height,
            signer = %hex::encode(authorized.signer),
            message = %authorized.message.kind(),
            "Message handled"
        );
        Ok(result)
    }

    fn apply_block_transactions(
        &mut self,
        height: BlockHeight,
        transactions: &[Vec<u8>],
    ) -> Result<Vec<TxResult>, UtilityError> {
        let mut results = Vec::with_capacity(transactions.len());
        for (index, raw) in (0u32..).zip(transactions) {
            results.push(self.apply_transaction(height, index, raw)?);
        }

        let mut ctx = UtilityContext::new(&mut self.store, height);
        let unstaked = ctx.unstake_actors_that_are_ready()?;
        let began_unstaking = ctx.begin_unstaking_max_paused_actors()?;
        if unstaked > 0 || began_unstaking > 0 {
            info!(height, unstaked, began_unstaking, "Lifecycle sweeps complete");
        }

        Ok(results)
    }

    /// Drop applied transactions from the pool, returning how many were
    /// pooled here.
    fn remove_from_mempool(&mut self, hashes: impl IntoIterator<Item = Hash>) -> usize {
        let mut removed = 0;
        for hash in hashes {
            match self.mempool.remove_transaction(&hash) {
                Ok(_) => removed += 1,
                // Proposed by another node, never pooled here
                Err(MempoolError::TransactionNotFound(_)) => {}
                Err(err) => warn!(
                    tx_hash = %hex::encode(hash),
                    error = %err,
                    "Failed to remove applied transaction from mempool"
                ),
            }
        }
        removed
    }
}

impl<S: LedgerStore, M: MempoolApi, D: MessageDispatch> UtilityApi for UtilityService<S, M, D> {
    fn check_transaction(&mut self, raw: Vec<u8>) -> Result<Hash, UtilityError> {
        match admission::check_transaction(&self.store, &mut self.mempool, raw) {
            Ok(hash) => {
                TRANSACTIONS_CHECKED.with_label_values(&["accepted"]).inc();
                info!(
                    tx_hash = %hex::encode(hash),
                    pending = self.mempool.len(),
                    "Transaction admitted"
                );
                Ok(hash)
            }
            Err(err) => {
                TRANSACTIONS_CHECKED.with_label_values(&[err.label()]).inc();
                warn!(code = err.code(), error = %err, "Transaction rejected");
                Err(err)
            }
        }
    }

    fn reap_block_transactions(&self) -> Vec<Vec<u8>> {
        self.mempool
            .reap_transactions(self.config.max_block_transactions, self.config.max_block_bytes)
    }

    fn apply_block(
        &mut self,
        height: BlockHeight,
        transactions: &[Vec<u8>],
    ) -> Result<Vec<TxResult>, UtilityError> {
        let _timer = HistogramTimer::new(&BLOCK_APPLY_DURATION);

        self.store.begin_savepoint();
        let results = match self.apply_block_transactions(height, transactions) {
            Ok(results) => results,
            Err(err) => {
                error!(height, error = %err, "Block application aborted");
                if let Err(rollback_err) = self.store.rollback_savepoint() {
                    error!(height, error = %rollback_err, "Block rollback failed");
                }
                return Err(err);
            }
        };
        self.store.release_savepoint()?;

        let pruned = self.remove_from_mempool(results.iter().map(|r| r.tx_hash));

        info!(
            height,
            tx_count = results.len(),
            pruned,
            failed = results.iter().filter(|r| !r.is_success()).count(),
            "Block applied"
        );
        Ok(results)
    }
}

/// Undo the innermost savepoint and pair the result with the error that
/// caused it. A failed rollback replaces the original error.
fn rollback<S: LedgerStore>(
    store: &mut S,
    result: TxResult,
    err: UtilityError,
) -> (TxResult, UtilityError) {
    match store.rollback_savepoint() {
        Ok(()) => (result, err),
        Err(rollback_err) => (result, rollback_err.into()),
    }
}

fn record(result: TxResult, outcome: Result<(), UtilityError>) -> TxResult {
    let kind = match result.message_kind.as_str() {
        "" => "unknown",
        kind => kind,
    };
    match outcome {
        Ok(()) => {
            TRANSACTIONS_APPLIED
                .with_label_values(&[kind, "success"])
                .inc();
            result
        }
        Err(err) => {
            TRANSACTIONS_APPLIED
                .with_label_values(&[kind, err.label()])
                .inc();
            debug!(
                height = result.height,
                index = result.index,
                code = err.code(),
                error = %err,
                "Transaction failed"
            );
            result.with_error(&err)
        }
    }
}

//! # Integration Test Flows
//!
//! Submission through the admission check into the mempool, reaping into a
//! block, and block application against the store.
//!
//! ```text
//! check_transaction ──→ TransactionPool ──reap──→ apply_block ──→ InMemoryLedger
//!                                                     │
//!                                                     └── mempool cleanup
//! ```

use super::fixtures::*;
use shared_crypto::transaction_hash;
use shared_types::{PoolName, U256};
use sl_01_persistence::{LedgerStore, StoreError};
use sl_02_mempool::MempoolApi;
use sl_03_utility::{UtilityApi, UtilityError};

// =============================================================================
// ADMISSION → MEMPOOL → BLOCK
// =============================================================================

#[test]
fn test_submitted_transactions_are_applied_and_leave_the_pool() {
    let (x, y) = (key(1), key(2));
    let mut svc = service(&[(x.address(), 1_000)]);

    for (i, amount) in [10u64, 20, 30].into_iter().enumerate() {
        svc.check_transaction(send(&x, y.address(), amount, &i.to_string()))
            .unwrap();
    }
    assert_eq!(svc.mempool().len(), 3);

    let block = svc.reap_block_transactions();
    let results = svc.apply_block(1, &block).unwrap();

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.is_success()));
    assert_eq!(
        results.iter().map(|r| r.index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert!(svc.mempool().is_empty());
    assert_eq!(balance(&svc, &y.address(), 1), U256::from(60u64));
    assert_eq!(balance(&svc, &x.address(), 1), U256::from(1_000 - 60 - 3 * FEE));
    assert_eq!(pool(&svc, PoolName::FeeCollector, 1), U256::from(3 * FEE));
}

#[test]
fn test_duplicate_submission_then_committed_resubmission() {
    let (x, y) = (key(1), key(2));
    let mut svc = service(&[(x.address(), 1_000)]);
    let raw = send(&x, y.address(), 10, "only-once");

    svc.check_transaction(raw.clone()).unwrap();
    assert_eq!(
        svc.check_transaction(raw.clone()),
        Err(UtilityError::DuplicateTransaction)
    );

    let block = svc.reap_block_transactions();
    svc.apply_block(1, &block).unwrap();

    assert_eq!(
        svc.check_transaction(raw),
        Err(UtilityError::AlreadyCommitted)
    );
    assert!(svc.mempool().is_empty());
}

#[test]
fn test_reencoded_committed_transaction_cannot_replay() {
    let (x, y) = (key(1), key(2));
    let mut svc = service(&[(x.address(), 1_000)]);
    let raw = send(&x, y.address(), 100, "1");
    assert!(svc.apply_block(1, &[raw.clone()]).unwrap()[0].is_success());

    // Same signed body with one extra top-level map entry
    let mut replay = raw;
    assert_eq!(replay[0], 0xA3);
    replay[0] = 0xA4;
    replay.extend_from_slice(&[0x62, b'z', b'z', 0x00]);

    assert!(matches!(
        svc.check_transaction(replay.clone()),
        Err(UtilityError::Decode(_))
    ));
    assert!(svc.mempool().is_empty());

    let results = svc.apply_block(2, &[replay]).unwrap();
    assert!(!results[0].is_success());
    assert_eq!(balance(&svc, &y.address(), 2), U256::from(100u64));
    assert_eq!(balance(&svc, &x.address(), 2), U256::from(1_000 - 100 - FEE));
}

#[test]
fn test_malformed_submission_is_never_pooled() {
    let x = key(1);
    let mut svc = service(&[(x.address(), 1_000)]);

    let mut tampered = send(&x, key(2).address(), 10, "1");
    let last = tampered.len() - 1;
    tampered[last] ^= 0x01;

    assert!(svc.check_transaction(tampered).is_err());
    assert!(svc.check_transaction(Vec::new()).is_err());
    assert!(svc.mempool().is_empty());
}

#[test]
fn test_block_from_another_proposer_applies_without_local_pool() {
    let (x, y) = (key(1), key(2));
    let mut svc = service(&[(x.address(), 100)]);

    let results = svc.apply_block(1, &[send(&x, y.address(), 5, "1")]).unwrap();

    assert!(results[0].is_success());
    assert_eq!(balance(&svc, &y.address(), 1), U256::from(5u64));
}

// =============================================================================
// ORDERING & ISOLATION
// =============================================================================

#[test]
fn test_transactions_apply_in_block_order() {
    let (x, y, z) = (key(1), key(2), key(3));
    let mut svc = service(&[(x.address(), 100)]);

    // y can only pay z with what x sends it earlier in the same block
    let block = vec![
        send(&x, y.address(), 50, "1"),
        send(&y, z.address(), 40, "2"),
    ];
    let results = svc.apply_block(1, &block).unwrap();

    assert!(results.iter().all(|r| r.is_success()));
    assert_eq!(balance(&svc, &z.address(), 1), U256::from(40u64));
    assert_eq!(balance(&svc, &y.address(), 1), U256::from(50 - 40 - FEE));

    // Reversed, y's payment fails at the ante-handle
    let mut svc = service(&[(x.address(), 100)]);
    let reversed: Vec<_> = block.into_iter().rev().collect();
    let results = svc.apply_block(1, &reversed).unwrap();
    assert!(!results[0].is_success());
    assert!(results[1].is_success());
}

#[test]
fn test_failed_transaction_does_not_poison_the_block() {
    let (x, y) = (key(1), key(2));
    let mut svc = service(&[(x.address(), 100)]);

    let block = vec![
        send(&x, y.address(), 10, "1"),
        send(&x, y.address(), 10_000, "2"),
        vec![0xde, 0xad],
        send(&x, y.address(), 10, "3"),
    ];
    let results = svc.apply_block(1, &block).unwrap();

    let outcomes: Vec<bool> = results.iter().map(|r| r.is_success()).collect();
    assert_eq!(outcomes, vec![true, false, false, true]);
    assert_eq!(balance(&svc, &y.address(), 1), U256::from(20u64));
    // Three authenticated transactions paid fees; the garbage did not
    assert_eq!(pool(&svc, PoolName::FeeCollector, 1), U256::from(3 * FEE));
    for raw in &block {
        assert!(svc
            .store()
            .transaction_exists(&transaction_hash(raw))
            .unwrap());
    }
}

#[test]
fn test_same_transaction_twice_in_one_block() {
    let (x, y) = (key(1), key(2));
    let mut svc = service(&[(x.address(), 100)]);
    let raw = send(&x, y.address(), 10, "1");

    let results = svc.apply_block(1, &[raw.clone(), raw]).unwrap();

    assert!(results[0].is_success());
    assert_eq!(results[1].code, UtilityError::AlreadyCommitted.code());
    assert_eq!(balance(&svc, &y.address(), 1), U256::from(10u64));
}

// =============================================================================
// FATAL STORE FAILURE
// =============================================================================

#[test]
fn test_store_failure_rolls_back_the_whole_block() {
    let (x, y) = (key(1), key(2));
    let mut svc = service_on(FaultyLedger::default(), &[(x.address(), 100)]);
    svc.store_mut().fail_index = true;

    let err = svc
        .apply_block(1, &[send(&x, y.address(), 10, "1")])
        .unwrap_err();

    assert_eq!(
        err,
        UtilityError::Store(StoreError::Database("index unavailable".into()))
    );
    assert!(err.is_fatal());
    assert_eq!(balance(&svc, &x.address(), 1), U256::from(100u64));
    assert_eq!(balance(&svc, &y.address(), 1), U256::zero());
    assert_eq!(pool(&svc, PoolName::FeeCollector, 1), U256::zero());
    assert_eq!(svc.store().inner.savepoint_depth(), 0);

    // The same block applies once the store recovers
    svc.store_mut().fail_index = false;
    let results = svc
        .apply_block(1, &[send(&x, y.address(), 10, "1")])
        .unwrap();
    assert!(results[0].is_success());
}

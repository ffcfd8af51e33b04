//! Ledger scenarios exercised end to end through the utility service.

use super::fixtures::*;
use shared_types::{ActorType, PoolName, StakeStatus, U256};
use sl_01_persistence::{InMemoryLedger, LedgerStore, ParamValue};
use sl_02_mempool::TransactionPool;
use sl_03_utility::{
    params, AuthorizedMessage, Message, MessageChangeParameter, MessageDispatch, MessageDoubleSign,
    MessageEditStake, MessageSend, MessageUnpause, MessageUnstake, UtilityApi, UtilityConfig,
    UtilityContext, UtilityError, UtilityService, Vote,
};

// =============================================================================
// SEND
// =============================================================================

#[test]
fn test_send_conserves_balances() {
    let (x, y) = (key(1), key(2));
    let mut svc = service(&[(x.address(), 500), (y.address(), 7)]);

    let results = svc.apply_block(1, &[send(&x, y.address(), 120, "1")]).unwrap();
    assert!(results[0].is_success());

    assert_eq!(balance(&svc, &x.address(), 1), U256::from(500 - 120 - FEE));
    assert_eq!(balance(&svc, &y.address(), 1), U256::from(7 + 120));
    assert_eq!(pool(&svc, PoolName::FeeCollector, 1), U256::from(FEE));
    // Height 0 still sees genesis
    assert_eq!(balance(&svc, &x.address(), 0), U256::from(500u64));
}

#[test]
fn test_overdrawn_send_leaves_sender_untouched() {
    let (x, y) = (key(1), key(2));
    let mut svc = service(&[(x.address(), 500)]);

    let err = svc
        .context(1)
        .handle_send(&MessageSend {
            from_address: x.address(),
            to_address: y.address(),
            amount: "600".into(),
        })
        .unwrap_err();

    assert!(matches!(err, UtilityError::InsufficientFunds { .. }));
    assert_eq!(balance(&svc, &x.address(), 1), U256::from(500u64));
    assert_eq!(balance(&svc, &y.address(), 1), U256::zero());
}

// =============================================================================
// STAKING LIFECYCLE
// =============================================================================

#[test]
fn test_stake_below_minimum_creates_no_actor() {
    let (owner, node) = (key(1), key(10));
    let mut svc = service(&[(owner.address(), 1_000)]);

    let msg = stake_message(ActorType::ServiceNode, &node, owner.address(), MIN_STAKE - 1);
    let results = svc.apply_block(1, &[sign(&msg, &owner, "1")]).unwrap();

    assert!(!results[0].is_success());
    assert!(!svc
        .store()
        .actor_exists(ActorType::ServiceNode, &node.address(), 1)
        .unwrap());
    assert_eq!(pool(&svc, PoolName::AppStake, 1), U256::zero());
}

#[test]
fn test_every_actor_type_stakes_into_the_app_stake_pool() {
    let owner = key(1);
    let mut svc = service(&[(owner.address(), 10_000)]);

    let block: Vec<_> = ActorType::ALL
        .into_iter()
        .zip(10u8..)
        .map(|(actor_type, seed)| {
            let msg = stake_message(actor_type, &key(seed), owner.address(), 1_000);
            sign(&msg, &owner, &seed.to_string())
        })
        .collect();
    let results = svc.apply_block(1, &block).unwrap();
    assert!(results.iter().all(|r| r.is_success()), "{results:?}");

    assert_eq!(pool(&svc, PoolName::AppStake, 1), U256::from(4_000u64));
    assert_eq!(
        balance(&svc, &owner.address(), 1),
        U256::from(10_000 - 4_000 - 4 * FEE)
    );
}

#[test]
fn test_unstake_twice_fails_with_invalid_status() {
    let (owner, node) = (key(1), key(10));
    let mut svc = service(&[(owner.address(), 2_000)]);
    let stake = stake_message(ActorType::ServiceNode, &node, owner.address(), 1_000);
    svc.apply_block(0, &[sign(&stake, &owner, "1")]).unwrap();

    let unstake = Message::Unstake(MessageUnstake {
        actor_type: ActorType::ServiceNode,
        address: node.address(),
    });
    let first = svc.apply_block(1, &[sign(&unstake, &owner, "2")]).unwrap();
    assert!(first[0].is_success());
    let after_first = svc
        .store()
        .get_actor(ActorType::ServiceNode, &node.address(), 1)
        .unwrap();

    let second = svc.apply_block(2, &[sign(&unstake, &owner, "3")]).unwrap();
    assert_eq!(
        second[0].code,
        UtilityError::InvalidStatus {
            expected: StakeStatus::Staked,
            actual: StakeStatus::Unstaking,
        }
        .code()
    );
    let after_second = svc
        .store()
        .get_actor(ActorType::ServiceNode, &node.address(), 2)
        .unwrap();
    assert_eq!(after_first, after_second);
    assert_eq!(after_second.unstaking_height, Some(1 + UNSTAKING_BLOCKS));
}

#[test]
fn test_released_actor_cannot_be_topped_up() {
    let (owner, node) = (key(1), key(10));
    let mut svc = service(&[(owner.address(), 2_000)]);
    let stake = stake_message(ActorType::ServiceNode, &node, owner.address(), 1_000);
    let unstake = Message::Unstake(MessageUnstake {
        actor_type: ActorType::ServiceNode,
        address: node.address(),
    });
    svc.apply_block(0, &[sign(&stake, &owner, "1")]).unwrap();
    svc.apply_block(1, &[sign(&unstake, &owner, "2")]).unwrap();
    svc.apply_block(1 + UNSTAKING_BLOCKS, &[]).unwrap();

    let edit = Message::EditStake(MessageEditStake {
        actor_type: ActorType::ServiceNode,
        address: node.address(),
        chains: vec!["0001".into()],
        amount: "500".into(),
        service_url: "https://node.example:443".into(),
    });
    let height = 2 + UNSTAKING_BLOCKS;
    let results = svc.apply_block(height, &[sign(&edit, &owner, "3")]).unwrap();
    assert_eq!(
        results[0].code,
        UtilityError::InvalidStatus {
            expected: StakeStatus::Staked,
            actual: StakeStatus::Unstaked,
        }
        .code()
    );

    let actor = svc
        .store()
        .get_actor(ActorType::ServiceNode, &node.address(), height)
        .unwrap();
    assert_eq!(actor.status, StakeStatus::Unstaked);
    assert_eq!(actor.staked_amount, U256::zero());
    assert_eq!(pool(&svc, PoolName::AppStake, height), U256::zero());
    assert_eq!(
        balance(&svc, &owner.address(), height),
        U256::from(2_000 - 3 * FEE)
    );
}

#[test]
fn test_edit_stake_cannot_decrease() {
    let (owner, node) = (key(1), key(10));
    let mut svc = service(&[(owner.address(), 2_000)]);
    let stake = stake_message(ActorType::Fisherman, &node, owner.address(), 500);
    svc.apply_block(0, &[sign(&stake, &owner, "1")]).unwrap();

    let edit = |amount: u64| {
        Message::EditStake(MessageEditStake {
            actor_type: ActorType::Fisherman,
            address: node.address(),
            chains: vec!["0001".into(), "0002".into()],
            amount: amount.to_string(),
            service_url: "https://fisher.example:8080".into(),
        })
    };

    let results = svc.apply_block(1, &[sign(&edit(499), &owner, "2")]).unwrap();
    assert_eq!(
        results[0].code,
        UtilityError::StakeDecreased {
            current: String::new(),
            requested: String::new(),
        }
        .code()
    );
    let actor = svc
        .store()
        .get_actor(ActorType::Fisherman, &node.address(), 1)
        .unwrap();
    assert_eq!(actor.staked_amount, U256::from(500u64));
    assert_eq!(actor.chains, vec!["0001".to_string()]);

    // Growing the stake charges only the difference
    let results = svc.apply_block(2, &[sign(&edit(800), &owner, "3")]).unwrap();
    assert!(results[0].is_success(), "{:?}", results[0].error);
    assert_eq!(
        pool(&svc, PoolName::AppStake, 2),
        U256::from(800u64)
    );
    assert_eq!(
        balance(&svc, &owner.address(), 2),
        U256::from(2_000 - 800 - 3 * FEE)
    );
}

#[test]
fn test_actor_visible_from_its_stake_height_only() {
    let (owner, node) = (key(1), key(10));
    let mut svc = service(&[(owner.address(), 2_000)]);
    let stake = stake_message(ActorType::Validator, &node, owner.address(), 1_000);

    svc.apply_block(1, &[]).unwrap();
    svc.apply_block(2, &[]).unwrap();
    let results = svc.apply_block(3, &[sign(&stake, &owner, "1")]).unwrap();
    assert!(results[0].is_success());

    let store = svc.store();
    assert!(!store.actor_exists(ActorType::Validator, &node.address(), 2).unwrap());
    assert!(store.actor_exists(ActorType::Validator, &node.address(), 3).unwrap());
    assert!(store.actor_exists(ActorType::Validator, &node.address(), 9).unwrap());
    assert!(store
        .get_actor(ActorType::Validator, &node.address(), 2)
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_unstake_scenario_releases_stake_at_unstaking_height() {
    let (owner, node) = (key(1), key(10));
    let mut svc = service(&[(owner.address(), 2_000)]);

    let stake = stake_message(ActorType::ServiceNode, &node, owner.address(), 1_000);
    svc.apply_block(0, &[sign(&stake, &owner, "1")]).unwrap();

    let unstake = Message::Unstake(MessageUnstake {
        actor_type: ActorType::ServiceNode,
        address: node.address(),
    });
    // The actor may sign for itself too; it needs fee money
    let block = vec![
        send(&owner, node.address(), 5, "2"),
        sign(&unstake, &node, "3"),
    ];
    let results = svc.apply_block(1, &block).unwrap();
    assert!(results.iter().all(|r| r.is_success()));

    let actor = svc
        .store()
        .get_actor(ActorType::ServiceNode, &node.address(), 1)
        .unwrap();
    assert_eq!(actor.status, StakeStatus::Unstaking);
    assert_eq!(actor.unstaking_height, Some(11));

    let ready_at = |h| {
        svc.store()
            .list_actors_ready_to_unstake(h, StakeStatus::Unstaking)
            .unwrap()
            .into_iter()
            .map(|a| a.address)
            .collect::<Vec<_>>()
    };
    assert_eq!(ready_at(11), vec![node.address()]);
    assert!(ready_at(5).is_empty());

    svc.apply_block(11, &[]).unwrap();

    let actor = svc
        .store()
        .get_actor(ActorType::ServiceNode, &node.address(), 11)
        .unwrap();
    assert_eq!(actor.status, StakeStatus::Unstaked);
    assert_eq!(pool(&svc, PoolName::AppStake, 11), U256::zero());
    assert_eq!(
        balance(&svc, &owner.address(), 11),
        U256::from(2_000 - 2 * FEE - 5)
    );
}

#[test]
fn test_unpause_waits_for_minimum_pause() {
    let (owner, node) = (key(1), key(10));
    let mut svc = service(&[(owner.address(), 2_000)]);
    let stake = stake_message(ActorType::ServiceNode, &node, owner.address(), 1_000);
    svc.apply_block(0, &[sign(&stake, &owner, "1")]).unwrap();

    svc.context(2)
        .pause_actor(ActorType::ServiceNode, &node.address())
        .unwrap();

    let unpause = Message::Unpause(MessageUnpause {
        actor_type: ActorType::ServiceNode,
        address: node.address(),
    });
    let early = svc.apply_block(3, &[sign(&unpause, &owner, "2")]).unwrap();
    assert_eq!(
        early[0].code,
        UtilityError::NotReadyToUnpause {
            paused_height: 0,
            minimum_pause_blocks: 0,
            height: 0,
        }
        .code()
    );

    // Default minimum pause is 4 blocks
    let on_time = svc.apply_block(6, &[sign(&unpause, &owner, "3")]).unwrap();
    assert!(on_time[0].is_success(), "{:?}", on_time[0].error);
    assert_eq!(
        svc.store()
            .get_actor_pause_height(ActorType::ServiceNode, &node.address(), 6)
            .unwrap(),
        None
    );

    let again = svc.apply_block(7, &[sign(&unpause, &owner, "4")]).unwrap();
    assert_eq!(again[0].code, UtilityError::NotPaused.code());
}

#[test]
fn test_long_paused_actor_is_swept_into_unstaking() {
    let (owner, node) = (key(1), key(10));
    let mut svc = service(&[(owner.address(), 2_000)]);
    let stake = stake_message(ActorType::Application, &node, owner.address(), 1_000);
    svc.apply_block(0, &[sign(&stake, &owner, "1")]).unwrap();
    svc.context(1)
        .pause_actor(ActorType::Application, &node.address())
        .unwrap();

    let sweep = 1 + MAX_PAUSE_BLOCKS;
    svc.apply_block(sweep - 1, &[]).unwrap();
    assert_eq!(
        svc.store()
            .get_actor_status(ActorType::Application, &node.address(), sweep - 1)
            .unwrap(),
        StakeStatus::Staked
    );

    svc.apply_block(sweep, &[]).unwrap();
    let actor = svc
        .store()
        .get_actor(ActorType::Application, &node.address(), sweep)
        .unwrap();
    assert_eq!(actor.status, StakeStatus::Unstaking);
    assert_eq!(actor.unstaking_height, Some(sweep + UNSTAKING_BLOCKS));

    svc.apply_block(sweep + UNSTAKING_BLOCKS, &[]).unwrap();
    assert_eq!(
        balance(&svc, &owner.address(), sweep + UNSTAKING_BLOCKS),
        U256::from(2_000 - FEE)
    );
}

// =============================================================================
// DOUBLE SIGN
// =============================================================================

#[test]
fn test_double_sign_burns_validator_stake() {
    let (owner, validator, reporter) = (key(1), key(10), key(20));
    let mut svc = service(&[(owner.address(), 2_000), (reporter.address(), 10)]);
    let stake = stake_message(ActorType::Validator, &validator, owner.address(), 1_000);
    svc.apply_block(0, &[sign(&stake, &owner, "1")]).unwrap();

    let vote = |block: u8| Vote {
        public_key: *validator.public_key().as_bytes(),
        height: 2,
        round: 0,
        vote_type: 1,
        block_hash: [block; 32],
    };
    let evidence = Message::DoubleSign(MessageDoubleSign {
        vote_a: vote(1),
        vote_b: vote(2),
        reporter_address: reporter.address(),
    });

    let results = svc.apply_block(3, &[sign(&evidence, &reporter, "1")]).unwrap();
    assert!(results[0].is_success(), "{:?}", results[0].error);

    // Default burn is 5 percent
    let actor = svc
        .store()
        .get_actor(ActorType::Validator, &validator.address(), 3)
        .unwrap();
    assert_eq!(actor.staked_amount, U256::from(950u64));
    assert_eq!(actor.status, StakeStatus::Staked);
    assert_eq!(pool(&svc, PoolName::AppStake, 3), U256::from(950u64));

    // Evidence older than the default eight blocks is refused
    let results = svc.apply_block(20, &[sign(&evidence, &reporter, "2")]).unwrap();
    assert_eq!(
        results[0].code,
        UtilityError::MaxEvidenceAgeExceeded { age: 0, max: 0 }.code()
    );
}

// =============================================================================
// GOVERNANCE
// =============================================================================

#[test]
fn test_only_the_owner_changes_a_parameter() {
    let outsider = key(3);
    let mut svc = service(&[(governor().address(), 100), (outsider.address(), 100)]);
    let change = Message::ChangeParameter(
        MessageChangeParameter::new(
            params::minimum_stake(ActorType::ServiceNode),
            &ParamValue::Amount(U256::from(5_000u64)),
        )
        .unwrap(),
    );

    let results = svc.apply_block(1, &[sign(&change, &outsider, "1")]).unwrap();
    assert_eq!(results[0].code, UtilityError::InvalidSigner.code());

    let results = svc.apply_block(2, &[sign(&change, &governor(), "1")]).unwrap();
    assert!(results[0].is_success(), "{:?}", results[0].error);
    assert_eq!(
        svc.context(2)
            .param_amount(&params::minimum_stake(ActorType::ServiceNode)),
        Ok(U256::from(5_000u64))
    );
    // The previous height keeps the previous value
    assert_eq!(
        svc.context(1)
            .param_amount(&params::minimum_stake(ActorType::ServiceNode)),
        Ok(U256::from(MIN_STAKE))
    );
}

#[test]
fn test_parameter_kind_cannot_change() {
    let mut svc = service(&[(governor().address(), 100)]);
    let change = Message::ChangeParameter(
        MessageChangeParameter::new(
            params::MESSAGE_SEND_FEE,
            &ParamValue::Text("free".into()),
        )
        .unwrap(),
    );

    let results = svc.apply_block(1, &[sign(&change, &governor(), "1")]).unwrap();
    assert!(matches!(
        results[0].error.as_deref(),
        Some(e) if e.contains(params::MESSAGE_SEND_FEE)
    ));
    assert_eq!(balance(&svc, &governor().address(), 1), U256::from(100 - FEE));
}

// =============================================================================
// FEE ACCOUNTING
// =============================================================================

/// Fails every message after the ante-handle has charged its fee.
struct RejectEverything;

impl MessageDispatch for RejectEverything {
    fn dispatch<S: LedgerStore>(
        &self,
        ctx: &mut UtilityContext<'_, S>,
        authorized: &AuthorizedMessage,
    ) -> Result<(), UtilityError> {
        // Leave a write behind so the rollback is observable
        ctx.add_pool_balance(PoolName::Dao, U256::from(1_000u64))?;
        Err(UtilityError::Validation(format!(
            "{} rejected",
            authorized.message.kind()
        )))
    }
}

#[test]
fn test_fee_charged_exactly_once_when_handler_fails() {
    let (x, y) = (key(1), key(2));
    let mut svc = UtilityService::with_dispatcher(
        InMemoryLedger::new(),
        TransactionPool::default(),
        RejectEverything,
        UtilityConfig::default(),
    );
    svc.init_genesis(&genesis(&[(x.address(), 500)])).unwrap();

    let results = svc
        .apply_block(1, &[send(&x, y.address(), 100, "1"), send(&x, y.address(), 100, "2")])
        .unwrap();

    assert!(results.iter().all(|r| !r.is_success()));
    assert!(results.iter().all(|r| r.signer == Some(x.address())));
    assert_eq!(balance(&svc, &x.address(), 1), U256::from(500 - 2 * FEE));
    assert_eq!(balance(&svc, &y.address(), 1), U256::zero());
    assert_eq!(pool(&svc, PoolName::FeeCollector, 1), U256::from(2 * FEE));
    assert_eq!(pool(&svc, PoolName::Dao, 1), U256::zero());
}

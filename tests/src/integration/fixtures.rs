//! Shared setup for the integration tests.

use shared_crypto::Ed25519KeyPair;
use shared_types::{ActorType, Address, BlockHeight, Hash, PoolName, U256};
use sl_01_persistence::{Actor, InMemoryLedger, LedgerStore, ParamValue, StoreError};
use sl_02_mempool::{MempoolConfig, TransactionPool};
use sl_03_utility::{
    params, GenesisAccount, GenesisParams, GenesisState, Message, MessageDispatch, MessageSend,
    MessageStake, Transaction, UtilityConfig, UtilityService,
};

pub const FEE: u64 = 1;
pub const MIN_STAKE: u64 = 100;
pub const UNSTAKING_BLOCKS: u64 = 10;
pub const MAX_PAUSE_BLOCKS: u64 = 50;

pub type Service<S = InMemoryLedger> = UtilityService<S, TransactionPool>;

pub fn key(seed: u8) -> Ed25519KeyPair {
    Ed25519KeyPair::from_seed([seed; 32])
}

pub fn governor() -> Ed25519KeyPair {
    key(250)
}

/// Default table with small fees and stakes so scenarios stay readable.
pub fn scenario_params() -> GenesisParams {
    let mut params = GenesisParams::with_owner(governor().address());
    let fees: Vec<String> = params
        .entries
        .keys()
        .filter(|k| k.starts_with("message_") && k.ends_with("_fee"))
        .cloned()
        .collect();
    for name in fees {
        params.set(name, ParamValue::Amount(U256::from(FEE)));
    }
    for actor_type in ActorType::ALL {
        params.set(
            params::minimum_stake(actor_type),
            ParamValue::Amount(U256::from(MIN_STAKE)),
        );
        params.set(
            params::unstaking_blocks(actor_type),
            ParamValue::Int(UNSTAKING_BLOCKS as i64),
        );
        params.set(
            params::max_pause_blocks(actor_type),
            ParamValue::Int(MAX_PAUSE_BLOCKS as i64),
        );
    }
    params
}

pub fn genesis(accounts: &[(Address, u64)]) -> GenesisState {
    GenesisState {
        accounts: accounts
            .iter()
            .map(|(address, amount)| GenesisAccount {
                address: *address,
                amount: U256::from(*amount),
            })
            .collect(),
        params: scenario_params(),
        ..GenesisState::default()
    }
}

pub fn service(accounts: &[(Address, u64)]) -> Service {
    service_on(InMemoryLedger::new(), accounts)
}

pub fn service_on<S: LedgerStore>(store: S, accounts: &[(Address, u64)]) -> Service<S> {
    let config = UtilityConfig {
        mempool: MempoolConfig::default(),
        max_block_transactions: 100,
        max_block_bytes: 64 * 1024,
    };
    let pool = TransactionPool::new(config.mempool.clone());
    let mut svc = UtilityService::with_config(store, pool, config);
    svc.init_genesis(&genesis(accounts)).expect("genesis must apply");
    svc
}

pub fn sign(message: &Message, signer: &Ed25519KeyPair, nonce: &str) -> Vec<u8> {
    let mut tx = Transaction::new(message, nonce).expect("encodable message");
    tx.sign(signer).expect("signable transaction");
    tx.encode().expect("encodable transaction")
}

pub fn send(from: &Ed25519KeyPair, to: Address, amount: u64, nonce: &str) -> Vec<u8> {
    let msg = Message::Send(MessageSend {
        from_address: from.address(),
        to_address: to,
        amount: amount.to_string(),
    });
    sign(&msg, from, nonce)
}

pub fn stake_message(
    actor_type: ActorType,
    actor: &Ed25519KeyPair,
    output: Address,
    amount: u64,
) -> Message {
    let chains = if actor_type.serves_chains() {
        vec!["0001".to_string()]
    } else {
        Vec::new()
    };
    Message::Stake(MessageStake {
        actor_type,
        public_key: *actor.public_key().as_bytes(),
        chains,
        amount: amount.to_string(),
        service_url: "https://actor.example:443".into(),
        output_address: output,
    })
}

pub fn balance<S: LedgerStore, D: MessageDispatch>(
    svc: &UtilityService<S, TransactionPool, D>,
    address: &Address,
    height: BlockHeight,
) -> U256 {
    svc.store()
        .get_account_balance(address, height)
        .unwrap_or_default()
}

pub fn pool<S: LedgerStore, D: MessageDispatch>(
    svc: &UtilityService<S, TransactionPool, D>,
    name: PoolName,
    height: BlockHeight,
) -> U256 {
    svc.store()
        .get_pool_balance(name, height)
        .unwrap_or_default()
}

/// In-memory store whose transaction index can be made to fail, to
/// exercise whole-block rollback.
#[derive(Default)]
pub struct FaultyLedger {
    pub inner: InMemoryLedger,
    pub fail_index: bool,
}

impl LedgerStore for FaultyLedger {
    fn get_account_balance(&self, address: &Address, height: BlockHeight) -> Result<U256, StoreError> {
        self.inner.get_account_balance(address, height)
    }

    fn set_account_balance(
        &mut self,
        address: Address,
        height: BlockHeight,
        balance: U256,
    ) -> Result<(), StoreError> {
        self.inner.set_account_balance(address, height, balance)
    }

    fn get_pool_balance(&self, pool: PoolName, height: BlockHeight) -> Result<U256, StoreError> {
        self.inner.get_pool_balance(pool, height)
    }

    fn set_pool_balance(
        &mut self,
        pool: PoolName,
        height: BlockHeight,
        balance: U256,
    ) -> Result<(), StoreError> {
        self.inner.set_pool_balance(pool, height, balance)
    }

    fn actor_exists(
        &self,
        actor_type: ActorType,
        address: &Address,
        height: BlockHeight,
    ) -> Result<bool, StoreError> {
        self.inner.actor_exists(actor_type, address, height)
    }

    fn get_actor(
        &self,
        actor_type: ActorType,
        address: &Address,
        height: BlockHeight,
    ) -> Result<Actor, StoreError> {
        self.inner.get_actor(actor_type, address, height)
    }

    fn insert_actor(&mut self, actor: Actor, height: BlockHeight) -> Result<(), StoreError> {
        self.inner.insert_actor(actor, height)
    }

    fn put_actor(&mut self, actor: Actor, height: BlockHeight) -> Result<(), StoreError> {
        self.inner.put_actor(actor, height)
    }

    fn list_actors(
        &self,
        actor_type: ActorType,
        height: BlockHeight,
    ) -> Result<Vec<Actor>, StoreError> {
        self.inner.list_actors(actor_type, height)
    }

    fn get_parameter(&self, name: &str, height: BlockHeight) -> Result<ParamValue, StoreError> {
        self.inner.get_parameter(name, height)
    }

    fn set_parameter(
        &mut self,
        name: &str,
        height: BlockHeight,
        value: ParamValue,
    ) -> Result<(), StoreError> {
        self.inner.set_parameter(name, height, value)
    }

    fn transaction_exists(&self, hash: &Hash) -> Result<bool, StoreError> {
        self.inner.transaction_exists(hash)
    }

    fn index_transaction(&mut self, hash: Hash, height: BlockHeight) -> Result<(), StoreError> {
        if self.fail_index {
            return Err(StoreError::Database("index unavailable".into()));
        }
        self.inner.index_transaction(hash, height)
    }

    fn begin_savepoint(&mut self) {
        self.inner.begin_savepoint()
    }

    fn rollback_savepoint(&mut self) -> Result<(), StoreError> {
        self.inner.rollback_savepoint()
    }

    fn release_savepoint(&mut self) -> Result<(), StoreError> {
        self.inner.release_savepoint()
    }
}

use crate::domain::{Actor, ParamValue, StoreError, Versioned};
use crate::ports::LedgerStore;
use shared_types::{address_hex, ActorType, Address, BlockHeight, Hash, PoolName, U256};
use std::collections::BTreeMap;
use tracing::debug;

/// What a single write replaced, so a savepoint can put it back.
#[derive(Debug, Clone)]
enum Undo {
    Account {
        address: Address,
        height: BlockHeight,
        previous: Option<U256>,
    },
    Pool {
        pool: PoolName,
        height: BlockHeight,
        previous: Option<U256>,
    },
    Actor {
        key: (ActorType, Address),
        height: BlockHeight,
        previous: Option<Actor>,
    },
    Parameter {
        name: String,
        height: BlockHeight,
        previous: Option<ParamValue>,
    },
    Transaction {
        hash: Hash,
    },
}

/// In-memory implementation of [`LedgerStore`].
///
/// All maps are ordered so iteration, and therefore every query result, is
/// deterministic.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    accounts: BTreeMap<Address, Versioned<U256>>,
    pools: BTreeMap<PoolName, Versioned<U256>>,
    actors: BTreeMap<(ActorType, Address), Versioned<Actor>>,
    parameters: BTreeMap<String, Versioned<ParamValue>>,
    transactions: BTreeMap<Hash, BlockHeight>,
    savepoints: Vec<Vec<Undo>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of savepoints currently open.
    pub fn savepoint_depth(&self) -> usize {
        self.savepoints.len()
    }

    /// Height at which a committed transaction was indexed.
    pub fn transaction_height(&self, hash: &Hash) -> Option<BlockHeight> {
        self.transactions.get(hash).copied()
    }

    fn record(&mut self, undo: Undo) {
        if let Some(frame) = self.savepoints.last_mut() {
            frame.push(undo);
        }
    }

    fn undo(&mut self, undo: Undo) {
        match undo {
            Undo::Account {
                address,
                height,
                previous,
            } => restore_version(&mut self.accounts, &address, height, previous),
            Undo::Pool {
                pool,
                height,
                previous,
            } => restore_version(&mut self.pools, &pool, height, previous),
            Undo::Actor {
                key,
                height,
                previous,
            } => restore_version(&mut self.actors, &key, height, previous),
            Undo::Parameter {
                name,
                height,
                previous,
            } => restore_version(&mut self.parameters, &name, height, previous),
            Undo::Transaction { hash } => {
                self.transactions.remove(&hash);
            }
        }
    }

    fn write_actor(&mut self, actor: Actor, height: BlockHeight) -> Result<(), StoreError> {
        let key = (actor.actor_type, actor.address);
        let label = || format!("actor/{}/{}", key.0, address_hex(&key.1));
        let previous = write_version(&mut self.actors, key, label, height, actor)?;
        self.record(Undo::Actor {
            key,
            height,
            previous,
        });
        Ok(())
    }
}

/// Put `value` at `height`, refusing to write beneath a newer version.
fn write_version<K: Ord, T>(
    map: &mut BTreeMap<K, Versioned<T>>,
    key: K,
    label: impl FnOnce() -> String,
    height: BlockHeight,
    value: T,
) -> Result<Option<T>, StoreError> {
    let history = map.entry(key).or_default();
    if let Some(latest) = history.latest_height() {
        if latest > height {
            return Err(StoreError::HeightRegression {
                key: label(),
                latest,
                attempted: height,
            });
        }
    }
    Ok(history.put(height, value))
}

fn restore_version<K: Ord, T>(
    map: &mut BTreeMap<K, Versioned<T>>,
    key: &K,
    height: BlockHeight,
    previous: Option<T>,
) {
    if let Some(history) = map.get_mut(key) {
        history.restore(height, previous);
        if history.is_empty() {
            map.remove(key);
        }
    }
}

impl LedgerStore for InMemoryLedger {
    fn get_account_balance(
        &self,
        address: &Address,
        height: BlockHeight,
    ) -> Result<U256, StoreError> {
        self.accounts
            .get(address)
            .and_then(|history| history.at(height))
            .copied()
            .ok_or_else(|| StoreError::not_found(format!("account {}", address_hex(address))))
    }

    fn set_account_balance(
        &mut self,
        address: Address,
        height: BlockHeight,
        balance: U256,
    ) -> Result<(), StoreError> {
        let label = || format!("account/{}", address_hex(&address));
        let previous = write_version(&mut self.accounts, address, label, height, balance)?;
        self.record(Undo::Account {
            address,
            height,
            previous,
        });
        Ok(())
    }

    fn get_pool_balance(&self, pool: PoolName, height: BlockHeight) -> Result<U256, StoreError> {
        self.pools
            .get(&pool)
            .and_then(|history| history.at(height))
            .copied()
            .ok_or_else(|| StoreError::not_found(format!("pool {pool}")))
    }

    fn set_pool_balance(
        &mut self,
        pool: PoolName,
        height: BlockHeight,
        balance: U256,
    ) -> Result<(), StoreError> {
        let label = || format!("pool/{pool}");
        let previous = write_version(&mut self.pools, pool, label, height, balance)?;
        self.record(Undo::Pool {
            pool,
            height,
            previous,
        });
        Ok(())
    }

    fn actor_exists(
        &self,
        actor_type: ActorType,
        address: &Address,
        height: BlockHeight,
    ) -> Result<bool, StoreError> {
        Ok(self
            .actors
            .get(&(actor_type, *address))
            .and_then(|history| history.at(height))
            .is_some())
    }

    fn get_actor(
        &self,
        actor_type: ActorType,
        address: &Address,
        height: BlockHeight,
    ) -> Result<Actor, StoreError> {
        self.actors
            .get(&(actor_type, *address))
            .and_then(|history| history.at(height))
            .cloned()
            .ok_or_else(|| {
                StoreError::not_found(format!("{actor_type} {}", address_hex(address)))
            })
    }

    fn insert_actor(&mut self, actor: Actor, height: BlockHeight) -> Result<(), StoreError> {
        if self.actor_exists(actor.actor_type, &actor.address, height)? {
            return Err(StoreError::AlreadyExists {
                what: format!("{} {}", actor.actor_type, address_hex(&actor.address)),
            });
        }
        self.write_actor(actor, height)
    }

    fn put_actor(&mut self, actor: Actor, height: BlockHeight) -> Result<(), StoreError> {
        if !self.actor_exists(actor.actor_type, &actor.address, height)? {
            return Err(StoreError::not_found(format!(
                "{} {}",
                actor.actor_type,
                address_hex(&actor.address)
            )));
        }
        self.write_actor(actor, height)
    }

    fn list_actors(
        &self,
        actor_type: ActorType,
        height: BlockHeight,
    ) -> Result<Vec<Actor>, StoreError> {
        Ok(self
            .actors
            .range((actor_type, [0u8; 20])..=(actor_type, [0xFF; 20]))
            .filter_map(|(_, history)| history.at(height).cloned())
            .collect())
    }

    fn get_parameter(&self, name: &str, height: BlockHeight) -> Result<ParamValue, StoreError> {
        self.parameters
            .get(name)
            .and_then(|history| history.at(height))
            .cloned()
            .ok_or_else(|| StoreError::not_found(format!("parameter {name}")))
    }

    fn set_parameter(
        &mut self,
        name: &str,
        height: BlockHeight,
        value: ParamValue,
    ) -> Result<(), StoreError> {
        let label = || format!("param/{name}");
        let previous = write_version(&mut self.parameters, name.to_string(), label, height, value)?;
        self.record(Undo::Parameter {
            name: name.to_string(),
            height,
            previous,
        });
        Ok(())
    }

    fn transaction_exists(&self, hash: &Hash) -> Result<bool, StoreError> {
        Ok(self.transactions.contains_key(hash))
    }

    fn index_transaction(&mut self, hash: Hash, height: BlockHeight) -> Result<(), StoreError> {
        if self.transactions.contains_key(&hash) {
            return Err(StoreError::AlreadyExists {
                what: format!("transaction {}", hex::encode(hash)),
            });
        }
        self.transactions.insert(hash, height);
        self.record(Undo::Transaction { hash });
        Ok(())
    }

    fn begin_savepoint(&mut self) {
        self.savepoints.push(Vec::new());
    }

    fn rollback_savepoint(&mut self) -> Result<(), StoreError> {
        let frame = self.savepoints.pop().ok_or(StoreError::NoSavepoint)?;
        debug!(writes = frame.len(), "Rolling back savepoint");
        for undo in frame.into_iter().rev() {
            self.undo(undo);
        }
        Ok(())
    }

    fn release_savepoint(&mut self) -> Result<(), StoreError> {
        let frame = self.savepoints.pop().ok_or(StoreError::NoSavepoint)?;
        // Outer savepoints must still be able to undo these writes
        if let Some(parent) = self.savepoints.last_mut() {
            parent.extend(frame);
        }
        Ok(())
    }
}

//! Store contract consumed by the utility.
//!
//! Reads take the height to resolve against; writes take the height at which
//! the new value becomes effective. A store never invents defaults: a key
//! with no version at or before the requested height is `NotFound`.

use crate::domain::{Actor, ActorUpdate, ParamValue, StoreError};
use shared_types::{ActorType, Address, BlockHeight, Hash, PoolName, StakeStatus, U256};

/// Height-versioned ledger state.
pub trait LedgerStore {
    // =========================================================================
    // ACCOUNTS & POOLS
    // =========================================================================

    fn get_account_balance(
        &self,
        address: &Address,
        height: BlockHeight,
    ) -> Result<U256, StoreError>;

    fn set_account_balance(
        &mut self,
        address: Address,
        height: BlockHeight,
        balance: U256,
    ) -> Result<(), StoreError>;

    fn get_pool_balance(&self, pool: PoolName, height: BlockHeight) -> Result<U256, StoreError>;

    fn set_pool_balance(
        &mut self,
        pool: PoolName,
        height: BlockHeight,
        balance: U256,
    ) -> Result<(), StoreError>;

    // =========================================================================
    // ACTORS
    // =========================================================================

    fn actor_exists(
        &self,
        actor_type: ActorType,
        address: &Address,
        height: BlockHeight,
    ) -> Result<bool, StoreError>;

    fn get_actor(
        &self,
        actor_type: ActorType,
        address: &Address,
        height: BlockHeight,
    ) -> Result<Actor, StoreError>;

    /// Fails with `AlreadyExists` if the actor has a record at `height`.
    fn insert_actor(&mut self, actor: Actor, height: BlockHeight) -> Result<(), StoreError>;

    /// Write a new version of an existing actor.
    fn put_actor(&mut self, actor: Actor, height: BlockHeight) -> Result<(), StoreError>;

    /// Every actor of `actor_type` that has a record at `height`, ascending
    /// by address.
    fn list_actors(
        &self,
        actor_type: ActorType,
        height: BlockHeight,
    ) -> Result<Vec<Actor>, StoreError>;

    fn update_actor(
        &mut self,
        actor_type: ActorType,
        address: &Address,
        height: BlockHeight,
        update: ActorUpdate,
    ) -> Result<(), StoreError> {
        let mut actor = self.get_actor(actor_type, address, height)?;
        actor.staked_amount = update.staked_amount;
        actor.chains = update.chains;
        actor.service_url = update.service_url;
        actor.max_relays = update.max_relays;
        self.put_actor(actor, height)
    }

    fn get_actor_status(
        &self,
        actor_type: ActorType,
        address: &Address,
        height: BlockHeight,
    ) -> Result<StakeStatus, StoreError> {
        Ok(self.get_actor(actor_type, address, height)?.status)
    }

    fn get_actor_pause_height(
        &self,
        actor_type: ActorType,
        address: &Address,
        height: BlockHeight,
    ) -> Result<Option<BlockHeight>, StoreError> {
        Ok(self.get_actor(actor_type, address, height)?.paused_height)
    }

    fn get_actor_unstaking_height(
        &self,
        actor_type: ActorType,
        address: &Address,
        height: BlockHeight,
    ) -> Result<Option<BlockHeight>, StoreError> {
        Ok(self.get_actor(actor_type, address, height)?.unstaking_height)
    }

    fn get_actor_output_address(
        &self,
        actor_type: ActorType,
        address: &Address,
        height: BlockHeight,
    ) -> Result<Address, StoreError> {
        Ok(self.get_actor(actor_type, address, height)?.output_address)
    }

    fn get_actor_stake_amount(
        &self,
        actor_type: ActorType,
        address: &Address,
        height: BlockHeight,
    ) -> Result<U256, StoreError> {
        Ok(self.get_actor(actor_type, address, height)?.staked_amount)
    }

    fn set_actor_stake_amount(
        &mut self,
        actor_type: ActorType,
        address: &Address,
        height: BlockHeight,
        amount: U256,
    ) -> Result<(), StoreError> {
        let mut actor = self.get_actor(actor_type, address, height)?;
        actor.staked_amount = amount;
        self.put_actor(actor, height)
    }

    fn set_actor_unstaking_height_and_status(
        &mut self,
        actor_type: ActorType,
        address: &Address,
        height: BlockHeight,
        unstaking_height: Option<BlockHeight>,
        status: StakeStatus,
    ) -> Result<(), StoreError> {
        let mut actor = self.get_actor(actor_type, address, height)?;
        actor.unstaking_height = unstaking_height;
        actor.status = status;
        self.put_actor(actor, height)
    }

    fn set_actor_pause_height(
        &mut self,
        actor_type: ActorType,
        address: &Address,
        height: BlockHeight,
        paused_height: Option<BlockHeight>,
    ) -> Result<(), StoreError> {
        let mut actor = self.get_actor(actor_type, address, height)?;
        actor.paused_height = paused_height;
        self.put_actor(actor, height)
    }

    /// Move every staked actor of `actor_type` paused at or before
    /// `paused_before` into `Unstaking`, returning their addresses.
    fn set_actors_unstaking_if_paused_before(
        &mut self,
        actor_type: ActorType,
        paused_before: BlockHeight,
        unstaking_height: BlockHeight,
        height: BlockHeight,
    ) -> Result<Vec<Address>, StoreError> {
        let mut moved = Vec::new();
        for mut actor in self.list_actors(actor_type, height)? {
            let overdue = matches!(actor.paused_height, Some(paused) if paused <= paused_before);
            if overdue && actor.status == StakeStatus::Staked {
                actor.status = StakeStatus::Unstaking;
                actor.unstaking_height = Some(unstaking_height);
                moved.push(actor.address);
                self.put_actor(actor, height)?;
            }
        }
        Ok(moved)
    }

    /// Actors of any type whose record at `height` has the given status and
    /// an unstaking height equal to `height`, ordered by address then type.
    fn list_actors_ready_to_unstake(
        &self,
        height: BlockHeight,
        status: StakeStatus,
    ) -> Result<Vec<Actor>, StoreError> {
        let mut ready = Vec::new();
        for actor_type in ActorType::ALL {
            ready.extend(
                self.list_actors(actor_type, height)?
                    .into_iter()
                    .filter(|a| a.status == status && a.unstaking_height == Some(height)),
            );
        }
        ready.sort_by(|a, b| (a.address, a.actor_type).cmp(&(b.address, b.actor_type)));
        Ok(ready)
    }

    // =========================================================================
    // PARAMETERS
    // =========================================================================

    fn get_parameter(&self, name: &str, height: BlockHeight) -> Result<ParamValue, StoreError>;

    fn set_parameter(
        &mut self,
        name: &str,
        height: BlockHeight,
        value: ParamValue,
    ) -> Result<(), StoreError>;

    // =========================================================================
    // TRANSACTION INDEX
    // =========================================================================

    /// Whether a transaction with this hash was committed at any height.
    fn transaction_exists(&self, hash: &Hash) -> Result<bool, StoreError>;

    fn index_transaction(&mut self, hash: Hash, height: BlockHeight) -> Result<(), StoreError>;

    // =========================================================================
    // SAVEPOINTS
    // =========================================================================

    /// Open a nested savepoint. Writes after this call can be undone by
    /// [`LedgerStore::rollback_savepoint`].
    fn begin_savepoint(&mut self);

    /// Undo every write since the innermost open savepoint and close it.
    fn rollback_savepoint(&mut self) -> Result<(), StoreError>;

    /// Close the innermost savepoint, keeping its writes.
    fn release_savepoint(&mut self) -> Result<(), StoreError>;
}

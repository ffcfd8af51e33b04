//! Actor lifecycle: unstake, pause/unpause and the end-of-block sweeps.
//!
//! ```text
//! Staked ──Unstake──→ Unstaking ──sweep at unstaking height──→ Unstaked
//!   │
//!   └── paused (missed blocks) ──Unpause──→ unpaused
//!          └── paused longer than max_pause_blocks ──→ Unstaking
//! ```

use crate::application::context::{not_exists, UtilityContext};
use crate::domain::errors::UtilityError;
use crate::domain::messages::{MessageUnpause, MessageUnstake};
use crate::domain::params;
use shared_types::{address_hex, ActorType, Address, PoolName, StakeStatus, U256};
use sl_01_persistence::LedgerStore;
use tracing::{debug, info};

impl<'a, S: LedgerStore> UtilityContext<'a, S> {
    pub fn handle_unstake(&mut self, msg: &MessageUnstake) -> Result<(), UtilityError> {
        let status = self
            .store
            .get_actor_status(msg.actor_type, &msg.address, self.height)
            .map_err(not_exists)?;
        if status != StakeStatus::Staked {
            return Err(UtilityError::InvalidStatus {
                expected: StakeStatus::Staked,
                actual: status,
            });
        }

        let unstaking_height = self.unstaking_height(msg.actor_type)?;
        self.store.set_actor_unstaking_height_and_status(
            msg.actor_type,
            &msg.address,
            self.height,
            Some(unstaking_height),
            StakeStatus::Unstaking,
        )?;

        debug!(
            height = self.height,
            actor = %address_hex(&msg.address),
            unstaking_height,
            "Actor unstaking"
        );
        Ok(())
    }

    pub fn handle_unpause(&mut self, msg: &MessageUnpause) -> Result<(), UtilityError> {
        let paused_height = self
            .store
            .get_actor_pause_height(msg.actor_type, &msg.address, self.height)
            .map_err(not_exists)?
            .ok_or(UtilityError::NotPaused)?;

        let minimum_pause_blocks = self.param_u64(&params::minimum_pause_blocks(msg.actor_type))?;
        if self.height < paused_height.saturating_add(minimum_pause_blocks) {
            return Err(UtilityError::NotReadyToUnpause {
                paused_height,
                minimum_pause_blocks,
                height: self.height,
            });
        }

        self.store
            .set_actor_pause_height(msg.actor_type, &msg.address, self.height, None)?;

        debug!(height = self.height, actor = %address_hex(&msg.address), "Actor unpaused");
        Ok(())
    }

    /// Mark an actor paused at the context height. Called by the
    /// missed-block logic; pausing an already paused actor keeps the
    /// original pause height.
    pub fn pause_actor(
        &mut self,
        actor_type: ActorType,
        address: &Address,
    ) -> Result<(), UtilityError> {
        let actor = self.actor(actor_type, address)?;
        if actor.is_paused() {
            return Ok(());
        }
        self.store
            .set_actor_pause_height(actor_type, address, self.height, Some(self.height))?;
        debug!(height = self.height, actor = %address_hex(address), "Actor paused");
        Ok(())
    }

    /// Release the stake of every actor whose unstaking height is now,
    /// returning how many were released.
    pub fn unstake_actors_that_are_ready(&mut self) -> Result<usize, UtilityError> {
        let ready = self
            .store
            .list_actors_ready_to_unstake(self.height, StakeStatus::Unstaking)?;

        for mut actor in ready.iter().cloned() {
            self.subtract_pool_balance(PoolName::AppStake, actor.staked_amount)?;
            self.add_account_balance(&actor.output_address, actor.staked_amount)?;

            actor.staked_amount = U256::zero();
            actor.status = StakeStatus::Unstaked;
            self.store.put_actor(actor, self.height)?;
        }

        if !ready.is_empty() {
            info!(height = self.height, count = ready.len(), "Released unstaked actors");
        }
        Ok(ready.len())
    }

    /// Start unstaking actors that stayed paused for `max_pause_blocks`.
    pub fn begin_unstaking_max_paused_actors(&mut self) -> Result<usize, UtilityError> {
        let mut total = 0;
        for actor_type in ActorType::ALL {
            let max_pause = self.param_u64(&params::max_pause_blocks(actor_type))?;
            let Some(paused_before) = self.height.checked_sub(max_pause) else {
                continue;
            };
            let unstaking_height = self.unstaking_height(actor_type)?;
            let moved = self.store.set_actors_unstaking_if_paused_before(
                actor_type,
                paused_before,
                unstaking_height,
                self.height,
            )?;
            total += moved.len();
        }

        if total > 0 {
            info!(height = self.height, count = total, "Paused actors began unstaking");
        }
        Ok(total)
    }

    fn unstaking_height(&self, actor_type: ActorType) -> Result<u64, UtilityError> {
        let blocks = self.param_u64(&params::unstaking_blocks(actor_type))?;
        Ok(self.height.saturating_add(blocks))
    }
}

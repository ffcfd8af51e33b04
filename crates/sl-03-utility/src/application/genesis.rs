use crate::application::context::UtilityContext;
use crate::domain::errors::UtilityError;
use crate::domain::genesis::GenesisState;
use shared_types::{PoolName, U256};
use sl_01_persistence::LedgerStore;
use tracing::info;

impl<'a, S: LedgerStore> UtilityContext<'a, S> {
    /// Write `genesis` at the context height.
    pub fn apply_genesis(&mut self, genesis: &GenesisState) -> Result<(), UtilityError> {
        for pool in PoolName::ALL {
            self.store.set_pool_balance(pool, self.height, U256::zero())?;
        }
        for pool in &genesis.pools {
            self.store.set_pool_balance(pool.name, self.height, pool.amount)?;
        }
        for account in &genesis.accounts {
            self.store
                .set_account_balance(account.address, self.height, account.amount)?;
        }
        for actor in &genesis.actors {
            self.store.insert_actor(actor.clone(), self.height)?;
        }
        for (name, value) in &genesis.params.entries {
            self.store.set_parameter(name, self.height, value.clone())?;
        }

        info!(
            height = self.height,
            accounts = genesis.accounts.len(),
            actors = genesis.actors.len(),
            params = genesis.params.entries.len(),
            "Genesis state written"
        );
        Ok(())
    }
}

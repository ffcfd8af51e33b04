//! Per-height execution context.

use crate::domain::errors::UtilityError;
use shared_types::{address_hex, checked_add, ActorType, Address, BlockHeight, PoolName, U256};
use sl_01_persistence::{Actor, LedgerStore, ParamValue, StoreError};

/// Exclusive view of the store at one height.
///
/// Every handler runs against a context; the height is never read from
/// ambient state.
pub struct UtilityContext<'a, S: LedgerStore> {
    pub store: &'a mut S,
    pub height: BlockHeight,
}

impl<'a, S: LedgerStore> UtilityContext<'a, S> {
    pub fn new(store: &'a mut S, height: BlockHeight) -> Self {
        Self { store, height }
    }

    // =========================================================================
    // BALANCES
    // =========================================================================

    /// Accounts that were never credited hold zero.
    pub fn account_balance(&self, address: &Address) -> Result<U256, UtilityError> {
        zero_if_missing(self.store.get_account_balance(address, self.height))
    }

    pub fn add_account_balance(
        &mut self,
        address: &Address,
        amount: U256,
    ) -> Result<(), UtilityError> {
        let balance = checked_add(self.account_balance(address)?, amount)?;
        Ok(self.store.set_account_balance(*address, self.height, balance)?)
    }

    pub fn subtract_account_balance(
        &mut self,
        address: &Address,
        amount: U256,
    ) -> Result<(), UtilityError> {
        let balance = self
            .account_balance(address)?
            .checked_sub(amount)
            .ok_or_else(|| UtilityError::InsufficientFunds {
                holder: address_hex(address),
            })?;
        Ok(self.store.set_account_balance(*address, self.height, balance)?)
    }

    pub fn pool_balance(&self, pool: PoolName) -> Result<U256, UtilityError> {
        zero_if_missing(self.store.get_pool_balance(pool, self.height))
    }

    pub fn add_pool_balance(&mut self, pool: PoolName, amount: U256) -> Result<(), UtilityError> {
        let balance = checked_add(self.pool_balance(pool)?, amount)?;
        Ok(self.store.set_pool_balance(pool, self.height, balance)?)
    }

    pub fn subtract_pool_balance(
        &mut self,
        pool: PoolName,
        amount: U256,
    ) -> Result<(), UtilityError> {
        let balance = self
            .pool_balance(pool)?
            .checked_sub(amount)
            .ok_or_else(|| UtilityError::InsufficientFunds {
                holder: pool.to_string(),
            })?;
        Ok(self.store.set_pool_balance(pool, self.height, balance)?)
    }

    // =========================================================================
    // ACTORS
    // =========================================================================

    pub fn actor(&self, actor_type: ActorType, address: &Address) -> Result<Actor, UtilityError> {
        self.store
            .get_actor(actor_type, address, self.height)
            .map_err(not_exists)
    }

    // =========================================================================
    // PARAMETERS
    // =========================================================================

    pub fn parameter(&self, name: &str) -> Result<ParamValue, UtilityError> {
        self.store
            .get_parameter(name, self.height)
            .map_err(|err| match err {
                StoreError::NotFound { .. } => UtilityError::ParameterNotFound(name.to_string()),
                other => UtilityError::Store(other),
            })
    }

    pub fn param_int(&self, name: &str) -> Result<i64, UtilityError> {
        let value = self.parameter(name)?;
        value.as_int().ok_or_else(|| mismatch(name, "int", &value))
    }

    /// Integer parameter used as a count of blocks or a percentage.
    /// Negative values are treated as zero.
    pub fn param_u64(&self, name: &str) -> Result<u64, UtilityError> {
        Ok(u64::try_from(self.param_int(name)?).unwrap_or(0))
    }

    pub fn param_amount(&self, name: &str) -> Result<U256, UtilityError> {
        let value = self.parameter(name)?;
        value.as_amount().ok_or_else(|| mismatch(name, "amount", &value))
    }

    pub fn param_address(&self, name: &str) -> Result<Address, UtilityError> {
        let value = self.parameter(name)?;
        value.as_address().ok_or_else(|| mismatch(name, "address", &value))
    }
}

fn zero_if_missing(result: Result<U256, StoreError>) -> Result<U256, UtilityError> {
    match result {
        Ok(balance) => Ok(balance),
        Err(err) if err.is_not_found() => Ok(U256::zero()),
        Err(err) => Err(UtilityError::Store(err)),
    }
}

pub(crate) fn not_exists(err: StoreError) -> UtilityError {
    if err.is_not_found() {
        UtilityError::NotExists
    } else {
        UtilityError::Store(err)
    }
}

fn mismatch(name: &str, expected: &'static str, actual: &ParamValue) -> UtilityError {
    UtilityError::ParameterTypeMismatch {
        name: name.to_string(),
        expected,
        actual: actual.kind(),
    }
}

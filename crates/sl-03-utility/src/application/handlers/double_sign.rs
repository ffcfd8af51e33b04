use crate::application::context::UtilityContext;
use crate::domain::errors::UtilityError;
use crate::domain::messages::MessageDoubleSign;
use crate::domain::params;
use shared_crypto::Ed25519PublicKey;
use shared_types::{address_hex, ActorType, Address, AmountError, PoolName, U256};
use sl_01_persistence::LedgerStore;
use tracing::info;

impl<'a, S: LedgerStore> UtilityContext<'a, S> {
    pub fn handle_double_sign(&mut self, msg: &MessageDoubleSign) -> Result<(), UtilityError> {
        let age = self.height.saturating_sub(msg.vote_a.height);
        let max = self.param_u64(params::VALIDATOR_MAX_EVIDENCE_AGE_IN_BLOCKS)?;
        if age > max {
            return Err(UtilityError::MaxEvidenceAgeExceeded { age, max });
        }

        let offender = Ed25519PublicKey::from_bytes(msg.vote_b.public_key)
            .map_err(|e| UtilityError::InvalidPublicKey(e.to_string()))?
            .address();
        let percentage = self.param_u64(params::DOUBLE_SIGN_BURN_PERCENTAGE)?;
        let burned = self.burn_actor(ActorType::Validator, percentage, &offender)?;

        info!(
            height = self.height,
            validator = %address_hex(&offender),
            reporter = %address_hex(&msg.reporter_address),
            burned = %burned,
            "Double sign slashed"
        );
        Ok(())
    }

    /// Burn `percentage` of an actor's stake out of its stake pool.
    /// Status is left untouched.
    pub fn burn_actor(
        &mut self,
        actor_type: ActorType,
        percentage: u64,
        address: &Address,
    ) -> Result<U256, UtilityError> {
        let stake = self.actor(actor_type, address)?.staked_amount;
        let burn = stake
            .checked_mul(U256::from(percentage.min(100)))
            .ok_or(AmountError::Overflow)?
            / U256::from(100u64);
        let remaining = stake.saturating_sub(burn);

        self.subtract_pool_balance(PoolName::AppStake, burn)?;
        self.store
            .set_actor_stake_amount(actor_type, address, self.height, remaining)?;
        Ok(burn)
    }
}

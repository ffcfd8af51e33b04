use crate::application::context::UtilityContext;
use crate::domain::errors::UtilityError;
use crate::domain::messages::{MessageEditStake, MessageStake};
use crate::domain::params;
use shared_crypto::Ed25519PublicKey;
use shared_types::{
    address_hex, parse_amount, ActorType, Address, AmountError, PoolName, StakeStatus, U256,
};
use sl_01_persistence::{Actor, ActorUpdate, LedgerStore};
use tracing::debug;

impl<'a, S: LedgerStore> UtilityContext<'a, S> {
    pub fn handle_stake(&mut self, msg: &MessageStake, signer: &Address) -> Result<(), UtilityError> {
        let public_key = Ed25519PublicKey::from_bytes(msg.public_key)
            .map_err(|e| UtilityError::InvalidPublicKey(e.to_string()))?;
        let address = public_key.address();

        let amount = self.check_above_minimum_stake(msg.actor_type, &msg.amount)?;
        let remaining = self
            .account_balance(signer)?
            .checked_sub(amount)
            .ok_or_else(|| UtilityError::InsufficientFunds {
                holder: address_hex(signer),
            })?;
        self.check_below_max_chains(msg.actor_type, &msg.chains)?;
        if self.store.actor_exists(msg.actor_type, &address, self.height)? {
            return Err(UtilityError::AlreadyExists);
        }

        let max_relays = match msg.actor_type {
            ActorType::Application => Some(self.calculate_app_relays(amount)?),
            _ => None,
        };

        self.store.set_account_balance(*signer, self.height, remaining)?;
        self.add_pool_balance(PoolName::AppStake, amount)?;
        self.store.insert_actor(
            Actor {
                actor_type: msg.actor_type,
                address,
                public_key: msg.public_key,
                output_address: msg.output_address,
                staked_amount: amount,
                chains: msg.chains.clone(),
                service_url: msg.service_url.clone(),
                max_relays,
                status: StakeStatus::Staked,
                paused_height: None,
                unstaking_height: None,
            },
            self.height,
        )?;

        debug!(
            height = self.height,
            actor = %address_hex(&address),
            actor_type = %msg.actor_type,
            amount = %amount,
            "Actor staked"
        );
        Ok(())
    }

    /// Stake can only grow through an edit; the signer pays the difference.
    /// Only `Staked` actors may be edited.
    pub fn handle_edit_stake(
        &mut self,
        msg: &MessageEditStake,
        signer: &Address,
    ) -> Result<(), UtilityError> {
        let actor = self.actor(msg.actor_type, &msg.address)?;
        if actor.status != StakeStatus::Staked {
            return Err(UtilityError::InvalidStatus {
                expected: StakeStatus::Staked,
                actual: actor.status,
            });
        }
        let amount = parse_amount(&msg.amount)?;
        let delta = amount
            .checked_sub(actor.staked_amount)
            .ok_or_else(|| UtilityError::StakeDecreased {
                current: actor.staked_amount.to_string(),
                requested: amount.to_string(),
            })?;
        let remaining = self
            .account_balance(signer)?
            .checked_sub(delta)
            .ok_or_else(|| UtilityError::InsufficientFunds {
                holder: address_hex(signer),
            })?;
        self.check_below_max_chains(msg.actor_type, &msg.chains)?;

        let max_relays = match msg.actor_type {
            ActorType::Application => Some(self.calculate_app_relays(amount)?),
            _ => None,
        };

        self.store.set_account_balance(*signer, self.height, remaining)?;
        self.add_pool_balance(PoolName::AppStake, delta)?;
        self.store.update_actor(
            msg.actor_type,
            &msg.address,
            self.height,
            ActorUpdate {
                staked_amount: amount,
                chains: msg.chains.clone(),
                service_url: msg.service_url.clone(),
                max_relays,
            },
        )?;

        debug!(
            height = self.height,
            actor = %address_hex(&msg.address),
            actor_type = %msg.actor_type,
            amount = %amount,
            delta = %delta,
            "Stake edited"
        );
        Ok(())
    }

    fn check_above_minimum_stake(
        &self,
        actor_type: ActorType,
        amount: &str,
    ) -> Result<U256, UtilityError> {
        let amount = parse_amount(amount)?;
        let minimum = self.param_amount(&params::minimum_stake(actor_type))?;
        if amount < minimum {
            return Err(UtilityError::BelowMinimumStake {
                amount: amount.to_string(),
                minimum: minimum.to_string(),
            });
        }
        Ok(amount)
    }

    fn check_below_max_chains(
        &self,
        actor_type: ActorType,
        chains: &[String],
    ) -> Result<(), UtilityError> {
        let max = if actor_type.serves_chains() {
            usize::try_from(self.param_u64(&params::max_chains(actor_type))?).unwrap_or(usize::MAX)
        } else {
            0
        };
        if chains.len() > max {
            return Err(UtilityError::MaxChainsExceeded {
                count: chains.len(),
                max,
            });
        }
        Ok(())
    }

    /// `stake * baseline_rate / 100 / 1_000_000 + stability_adjustment`,
    /// never below zero.
    pub fn calculate_app_relays(&self, stake: U256) -> Result<U256, UtilityError> {
        let rate = self.param_u64(params::APP_BASELINE_STAKE_RATE)?;
        let adjustment = self.param_int(params::APP_STABILITY_ADJUSTMENT)?;

        let base = stake
            .checked_mul(U256::from(rate))
            .ok_or(AmountError::Overflow)?
            / U256::from(100u64)
            / U256::from(1_000_000u64);

        let magnitude = U256::from(adjustment.unsigned_abs());
        if adjustment >= 0 {
            Ok(base
                .checked_add(magnitude)
                .ok_or(AmountError::Overflow)?)
        } else {
            Ok(base.saturating_sub(magnitude))
        }
    }
}

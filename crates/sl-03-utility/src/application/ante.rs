//! Ante-handle: authenticate the signer and collect the fee before any
//! message-specific effect runs.

use crate::application::context::{not_exists, UtilityContext};
use crate::domain::errors::UtilityError;
use crate::domain::messages::Message;
use crate::domain::params;
use crate::domain::transaction::Transaction;
use shared_crypto::Ed25519PublicKey;
use shared_types::{address_hex, ActorType, Address, PoolName, U256};
use sl_01_persistence::LedgerStore;
use sl_telemetry::FEES_COLLECTED;
use tracing::debug;

/// A message whose signer has been authorized and whose fee has been paid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedMessage {
    pub message: Message,
    pub signer: Address,
    pub fee: U256,
}

impl<'a, S: LedgerStore> UtilityContext<'a, S> {
    /// Run the seven ante steps in order. Nothing is written unless every
    /// check passes.
    pub fn ante_handle(&mut self, tx: &Transaction) -> Result<AuthorizedMessage, UtilityError> {
        // 1. Inner message
        let message = tx.message()?;

        // 2. Fee for this kind
        let fee = self.fee_for(&message)?;

        // 3. Signer public key
        let address = tx.signer_public_key()?.address();

        // 4. Signer balance; a missing account holds zero
        let balance = match self.store.get_account_balance(&address, self.height) {
            Ok(balance) => balance,
            Err(err) if err.is_not_found() => U256::zero(),
            Err(err) => return Err(UtilityError::AccountLookup(err)),
        };

        // 5. Sufficiency, before any write
        let remaining = balance
            .checked_sub(fee)
            .ok_or_else(|| UtilityError::InsufficientFunds {
                holder: address_hex(&address),
            })?;

        // 6. Authorization
        let candidates = self.signer_candidates(&message)?;
        if !candidates.contains(&address) {
            return Err(UtilityError::InvalidSigner);
        }

        // 7. Commit
        self.store.set_account_balance(address, self.height, remaining)?;
        self.add_pool_balance(PoolName::FeeCollector, fee)?;
        FEES_COLLECTED.inc();

        debug!(
            height = self.height,
            signer = %address_hex(&address),
            message = %message.kind(),
            fee = %fee,
            "Ante-handle passed"
        );

        Ok(AuthorizedMessage {
            message,
            signer: address,
            fee,
        })
    }

    pub fn fee_for(&self, message: &Message) -> Result<U256, UtilityError> {
        let key = params::fee_key(message);
        match self.param_amount(&key) {
            Err(UtilityError::ParameterNotFound(_)) => Err(UtilityError::FeeNotConfigured(key)),
            other => other,
        }
    }

    /// Addresses allowed to sign `message`.
    pub fn signer_candidates(&self, message: &Message) -> Result<Vec<Address>, UtilityError> {
        match message {
            Message::Send(m) => Ok(vec![m.from_address]),
            Message::Stake(m) => {
                let public_key = Ed25519PublicKey::from_bytes(m.public_key)
                    .map_err(|e| UtilityError::InvalidPublicKey(e.to_string()))?;
                Ok(vec![m.output_address, public_key.address()])
            }
            Message::EditStake(m) => self.actor_signer_candidates(m.actor_type, &m.address),
            Message::Unstake(m) => self.actor_signer_candidates(m.actor_type, &m.address),
            Message::Unpause(m) => self.actor_signer_candidates(m.actor_type, &m.address),
            Message::DoubleSign(m) => Ok(vec![m.reporter_address]),
            Message::ChangeParameter(m) => {
                let owner = self.param_address(&params::owner_key(&m.parameter_key))?;
                Ok(vec![owner])
            }
        }
    }

    fn actor_signer_candidates(
        &self,
        actor_type: ActorType,
        address: &Address,
    ) -> Result<Vec<Address>, UtilityError> {
        let output = self
            .store
            .get_actor_output_address(actor_type, address, self.height)
            .map_err(not_exists)?;
        Ok(vec![output, *address])
    }
}

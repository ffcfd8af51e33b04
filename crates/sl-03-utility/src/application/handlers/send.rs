use crate::application::context::UtilityContext;
use crate::domain::errors::UtilityError;
use crate::domain::messages::MessageSend;
use shared_types::{address_hex, parse_amount};
use sl_01_persistence::LedgerStore;
use tracing::debug;

impl<'a, S: LedgerStore> UtilityContext<'a, S> {
    /// Move `amount` from `from` to `to`. The recipient needs no prior
    /// account.
    pub fn handle_send(&mut self, msg: &MessageSend) -> Result<(), UtilityError> {
        let amount = parse_amount(&msg.amount)?;

        // Sufficiency before any write
        let from_balance = self.account_balance(&msg.from_address)?;
        if from_balance < amount {
            return Err(UtilityError::InsufficientFunds {
                holder: address_hex(&msg.from_address),
            });
        }

        self.subtract_account_balance(&msg.from_address, amount)?;
        self.add_account_balance(&msg.to_address, amount)?;

        debug!(
            height = self.height,
            from = %address_hex(&msg.from_address),
            to = %address_hex(&msg.to_address),
            amount = %amount,
            "Send applied"
        );
        Ok(())
    }
}

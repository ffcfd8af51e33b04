//! Message dispatch.

use crate::application::ante::AuthorizedMessage;
use crate::application::context::UtilityContext;
use crate::domain::errors::UtilityError;
use crate::domain::messages::Message;
use sl_01_persistence::LedgerStore;

/// Routes an authorized message to its handler.
///
/// The service is generic over this trait so tests can substitute a
/// dispatcher that fails after the fee has been charged.
pub trait MessageDispatch {
    fn dispatch<S: LedgerStore>(
        &self,
        ctx: &mut UtilityContext<'_, S>,
        authorized: &AuthorizedMessage,
    ) -> Result<(), UtilityError>;
}

/// Production dispatcher: one arm per message kind, no fallthrough.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageDispatcher;

impl MessageDispatch for MessageDispatcher {
    fn dispatch<S: LedgerStore>(
        &self,
        ctx: &mut UtilityContext<'_, S>,
        authorized: &AuthorizedMessage,
    ) -> Result<(), UtilityError> {
        let signer = &authorized.signer;
        match &authorized.message {
            Message::Send(m) => ctx.handle_send(m),
            Message::Stake(m) => ctx.handle_stake(m, signer),
            Message::EditStake(m) => ctx.handle_edit_stake(m, signer),
            Message::Unstake(m) => ctx.handle_unstake(m),
            Message::Unpause(m) => ctx.handle_unpause(m),
            Message::DoubleSign(m) => ctx.handle_double_sign(m),
            Message::ChangeParameter(m) => ctx.handle_change_parameter(m),
        }
    }
}

/// Dispatcher that always fails with a structural error, for testing
/// fee accounting.
#[cfg(test)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingDispatcher;

#[cfg(test)]
impl MessageDispatch for FailingDispatcher {
    fn dispatch<S: LedgerStore>(
        &self,
        _ctx: &mut UtilityContext<'_, S>,
        authorized: &AuthorizedMessage,
    ) -> Result<(), UtilityError> {
        Err(UtilityError::Validation(format!(
            "forced failure for {}",
            authorized.message.kind()
        )))
    }
}

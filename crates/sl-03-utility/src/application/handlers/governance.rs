use crate::application::context::UtilityContext;
use crate::domain::errors::UtilityError;
use crate::domain::messages::MessageChangeParameter;
use sl_01_persistence::LedgerStore;
use tracing::info;

impl<'a, S: LedgerStore> UtilityContext<'a, S> {
    /// Replace an existing parameter with a value of the same type.
    pub fn handle_change_parameter(
        &mut self,
        msg: &MessageChangeParameter,
    ) -> Result<(), UtilityError> {
        let value = msg.decode_value()?;
        let current = self.parameter(&msg.parameter_key)?;
        if !current.same_kind(&value) {
            return Err(UtilityError::ParameterTypeMismatch {
                name: msg.parameter_key.clone(),
                expected: current.kind(),
                actual: value.kind(),
            });
        }

        info!(
            height = self.height,
            parameter = %msg.parameter_key,
            old = %current,
            new = %value,
            "Parameter changed"
        );
        self.store.set_parameter(&msg.parameter_key, self.height, value)?;
        Ok(())
    }
}

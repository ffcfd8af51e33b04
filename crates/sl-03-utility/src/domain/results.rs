use crate::domain::errors::{UtilityError, CODE_OK};
use crate::domain::messages::MessageKind;
use serde::{Deserialize, Serialize};
use shared_types::{Address, BlockHeight, Hash};

/// Outcome of one transaction inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResult {
    pub height: BlockHeight,
    pub index: u32,
    pub tx_hash: Hash,
    pub signer: Option<Address>,
    pub recipient: Option<Address>,
    /// Empty when the message could not be decoded.
    pub message_kind: String,
    /// `0` on success, otherwise [`UtilityError::code`].
    pub code: u32,
    pub error: Option<String>,
}

impl TxResult {
    pub fn is_success(&self) -> bool {
        self.code == CODE_OK
    }

    pub(crate) fn new(height: BlockHeight, index: u32, tx_hash: Hash) -> Self {
        Self {
            height,
            index,
            tx_hash,
            signer: None,
            recipient: None,
            message_kind: String::new(),
            code: CODE_OK,
            error: None,
        }
    }

    pub(crate) fn with_message(
        mut self,
        kind: MessageKind,
        signer: Option<Address>,
        recipient: Option<Address>,
    ) -> Self {
        self.message_kind = kind.as_str().to_string();
        self.signer = signer;
        self.recipient = recipient;
        self
    }

    pub(crate) fn with_error(mut self, err: &UtilityError) -> Self {
        self.code = err.code();
        self.error = Some(err.to_string());
        self
    }
}

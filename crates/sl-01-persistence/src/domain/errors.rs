use shared_types::BlockHeight;
use thiserror::Error;

/// Failures of the ledger store.
///
/// `NotFound` is an ordinary answer ("nothing recorded at that height").
/// Every other variant means the store cannot be trusted for the current
/// block and callers must stop applying it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("Already exists: {what}")]
    AlreadyExists { what: String },

    #[error("Height regression for {key}: latest version at {latest}, write at {attempted}")]
    HeightRegression {
        key: String,
        latest: BlockHeight,
        attempted: BlockHeight,
    },

    #[error("No open savepoint")]
    NoSavepoint,

    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    pub fn not_found(what: impl Into<String>) -> Self {
        StoreError::NotFound { what: what.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

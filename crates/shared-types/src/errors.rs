//! # Error Types
//!
//! Errors raised while parsing or combining primitive values.

use thiserror::Error;

/// Errors produced by amount parsing and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The string is not a base-10 non-negative integer.
    #[error("Invalid amount: {0:?} is not a non-negative decimal integer")]
    InvalidFormat(String),

    /// The value does not fit in 256 bits.
    #[error("Amount overflow")]
    Overflow,

    /// Subtraction would produce a negative amount.
    #[error("Amount underflow: {minuend} - {subtrahend}")]
    Underflow { minuend: String, subtrahend: String },
}

/// Errors produced when decoding enumerations from their wire names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnumParseError {
    #[error("Unknown actor type: {0}")]
    UnknownActorType(String),

    #[error("Unknown pool: {0}")]
    UnknownPool(String),
}

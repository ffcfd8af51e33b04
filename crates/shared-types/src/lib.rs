//! # Shared Types Crate
//!
//! Primitives used across the Stake-Ledger subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Address`, `Hash`, `BlockHeight` and the
//!   actor enumerations are defined once here.
//! - **No Floating Point**: every amount is a `U256` parsed from a decimal
//!   string; arithmetic on amounts is always checked.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;

//! # sl-01-persistence
//!
//! Height-versioned ledger store for Stake-Ledger.
//!
//! ## Role in System
//!
//! - **Single Source of Truth**: balances of accounts and pools, actor
//!   records and governance parameters, all stamped with the height at which
//!   they became effective
//! - **Point-in-time reads**: a read at height `H` returns the latest value
//!   whose effective height is `<= H`, never a future one
//! - **Savepoints**: the utility opens a savepoint around each transaction so
//!   a failed transaction leaves no partial writes behind
//!
//! ## Versioning
//!
//! ```text
//! key ──→ { h0: v0, h3: v1, h7: v2 }
//!
//! read(key, 5)  = v1      (latest at or before 5)
//! read(key, 2)  = v0
//! write(key, 4) = HeightRegression  (a newer version already exists)
//! ```
//!
//! ## Module Structure
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `domain` | `Actor`, `ParamValue`, `Versioned<T>`, `StoreError` |
//! | `ports` | `LedgerStore` trait consumed by the utility |
//! | `adapters` | `InMemoryLedger`, BTreeMap-backed implementation |

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use ports::*;

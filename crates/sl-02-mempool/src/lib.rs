//! # Transaction Pool (Mempool)
//!
//! Holds raw transactions that passed admission checks until a block
//! includes them.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | No duplicate transactions | `TransactionPool::add_transaction` hash check |
//! | FIFO reaping | insertion sequence numbers in `TransactionPool::order` |
//! | Bounded memory | count and byte limits, oldest evicted first |
//!
//! The pool stores opaque bytes. Decoding and validation happen in the
//! utility's admission check before a transaction reaches this crate; the
//! pool only answers "have I seen this hash" and keeps arrival order.
//!
//! ```text
//! add ──→ [by_hash + order] ──reap──→ block proposer
//!                  │
//!                  └── remove (after the block commits)
//! ```

pub mod domain;
pub mod ports;

pub use domain::*;
pub use ports::*;

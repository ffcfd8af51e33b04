//! # SL-03: Utility Subsystem
//!
//! Deterministic transaction application for a staking chain: every node
//! applying the same block to the same store reaches the same state.
//!
//! ## Architecture
//!
//! - **Domain**: messages, the CBOR transaction envelope, governance
//!   parameters, genesis state, per-transaction results, errors
//! - **Application**: the per-height [`UtilityContext`], the ante-handle,
//!   the message dispatcher, one handler per message kind, the lifecycle
//!   sweeps and the [`UtilityService`]
//! - **Ports**: Inbound ([`UtilityApi`])
//!
//! ## Transaction Flow
//!
//! ```text
//! raw bytes ──check_transaction──→ mempool ──reap──→ proposed block
//!
//! apply_block(height, txs)
//!   └─ for each tx, in block order:
//!        decode + validate_basic ──✗──→ failed result, no fee
//!        [savepoint] ante-handle  ──✗──→ rollback, failed result, no fee
//!        [savepoint] dispatch     ──✗──→ rollback handler writes, fee kept
//!        index hash
//!   └─ unstake ready actors, begin unstaking long-paused actors
//! ```
//!
//! A store failure (anything but "not found") aborts the whole block and
//! rolls it back.

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::{
    AuthorizedMessage, MessageDispatch, MessageDispatcher, UtilityContext, UtilityService,
};
pub use config::UtilityConfig;
pub use domain::params::GenesisParams;
pub use domain::*;
pub use ports::inbound::UtilityApi;

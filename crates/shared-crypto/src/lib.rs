//! # Shared Crypto
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `signatures` | Ed25519 | Transaction signing, signer recovery |
//! | `hashing` | SHA3-256, SHA-256 | Transaction hashes, address derivation |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, no RNG dependency
//! - **Addresses**: First 20 bytes of SHA-256 over the 32-byte public key

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod signatures;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{address_from_public_key, transaction_hash};
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

//! # Hashing
//!
//! - SHA3-256 over the exact received transaction bytes: the mempool and
//!   the transaction index are keyed by it.
//! - SHA-256 over a public key, truncated to 20 bytes: account addresses.

use sha2::Sha256;
use sha3::{Digest, Sha3_256};
use shared_types::{Address, Hash, PublicKeyBytes, ADDRESS_LEN};

/// Canonical transaction hash. Never computed over a re-encoding.
pub fn transaction_hash(raw: &[u8]) -> Hash {
    let digest = Sha3_256::digest(raw);
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&digest);
    hash
}

/// Derive the address owned by a public key.
pub fn address_from_public_key(public_key: &PublicKeyBytes) -> Address {
    let digest = Sha256::digest(public_key);
    let mut address = [0u8; ADDRESS_LEN];
    address.copy_from_slice(&digest[..ADDRESS_LEN]);
    address
}

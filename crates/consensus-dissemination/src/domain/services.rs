//! Domain services: hashing and identity derivation.

use sha3::{Digest, Keccak256};
use shared_types::{Address, Hash, NodeId};

/// Keccak-256 digest of `data`.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Keccak256::digest(data));
    out
}

/// Content digest of a consensus payload, used as the deduplication key.
///
/// Only the payload bytes are hashed; the message code is not part of the
/// fingerprint, so the same bytes sent under two codes deduplicate together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(pub Hash);

impl Fingerprint {
    /// Fingerprint the given payload.
    pub fn of(payload: &[u8]) -> Self {
        Self(keccak256(payload))
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

/// Network identity of a 64-byte uncompressed public key (X || Y).
pub fn node_id_from_public_key(public_key: &[u8; 64]) -> NodeId {
    NodeId(keccak256(public_key))
}

/// Validator address of a 64-byte uncompressed public key (X || Y).
pub fn address_from_public_key(public_key: &[u8; 64]) -> Address {
    let digest = keccak256(public_key);
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    address
}

//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Chain**: `Hash`, `BlockHeader`
//! - **Validators**: `Address`, `ValidatorData`
//! - **Networking**: `NodeId`

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// A 32-byte Keccak-256 hash.
pub type Hash = [u8; 32];

/// Minimal block header view needed to locate a validator-set snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockHeader {
    /// Block number in the chain (0 = genesis).
    pub number: u64,
    /// Hash of this header.
    pub hash: Hash,
    /// Hash of the parent header.
    pub parent_hash: Hash,
    /// Unix timestamp when the block was proposed.
    pub timestamp: u64,
}

// =============================================================================
// CLUSTER B: VALIDATORS
// =============================================================================

/// A 20-byte Ethereum-style address.
///
/// Validator addresses are the last 20 bytes of the Keccak-256 hash of the
/// uncompressed secp256k1 signing key.
pub type Address = [u8; 20];

/// Render an address as `0x`-prefixed lowercase hex.
pub fn address_to_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// One entry of a validator set: signing address plus BLS public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorData {
    /// Consensus signing address.
    pub address: Address,
    /// Compressed BLS public key used for aggregated seals.
    pub bls_public_key: Vec<u8>,
}

/// Split validator data into parallel address and BLS key lists.
///
/// Ordering is preserved: `addresses[i]` and `bls_keys[i]` describe the same
/// validator.
pub fn separate_validator_data(validators: &[ValidatorData]) -> (Vec<Address>, Vec<Vec<u8>>) {
    validators
        .iter()
        .map(|v| (v.address, v.bls_public_key.clone()))
        .unzip()
}

// =============================================================================
// CLUSTER C: NETWORKING
// =============================================================================

/// Unique identifier for a node in the network.
///
/// Derived as the Keccak-256 hash of the node's uncompressed public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct NodeId(pub [u8; 32]);

impl NodeId {
    /// Full lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for NodeId {
    /// Abbreviated form, first eight bytes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

//! # Core Domain Entities
//!
//! - [`DeliveryIntent`]: one outbound multicast request
//! - [`SentryRelationship`]: internal/external identity pair of a relay
//! - [`PeerPurpose`]: capability filter for peer enumeration
//! - [`Snapshot`]: validator set valid at a block
//! - [`BlockNumber`]: block selector for snapshot queries
//! - [`InboundVerdict`]: what the receive path should do with a payload

use serde::Serialize;
use shared_types::{Address, Hash, ValidatorData};
use std::str::FromStr;
use std::sync::Arc;

use super::Enode;

/// Immutable description of a single multicast call.
///
/// `destinations == None` means every connected peer. `Some(vec![])` means
/// nobody: an explicit but empty target set resolves to no peers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryIntent {
    pub payload: Arc<[u8]>,
    pub msg_code: u64,
    pub destinations: Option<Vec<Address>>,
    pub send_to_self: bool,
}

impl DeliveryIntent {
    pub fn new(
        destinations: Option<Vec<Address>>,
        payload: impl Into<Arc<[u8]>>,
        msg_code: u64,
        send_to_self: bool,
    ) -> Self {
        Self {
            payload: payload.into(),
            msg_code,
            destinations,
            send_to_self,
        }
    }
}

/// A sentry that relays consensus traffic for this validator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentryRelationship {
    /// Identity used on the private sentry <-> validator link.
    pub node: Enode,
    /// Identity the sentry advertises to the public network on our behalf.
    pub external: Enode,
}

/// Capability filter used when enumerating connected peers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PeerPurpose {
    /// No filtering.
    Any,
    /// Peers connected as consensus validators.
    Validator,
    /// Peers connected as sentry relays.
    Sentry,
}

/// Validator-set snapshot at a given block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub number: u64,
    pub hash: Hash,
    pub validators: Vec<ValidatorData>,
}

impl Snapshot {
    /// Ordered validator data.
    pub fn validators(&self) -> &[ValidatorData] {
        &self.validators
    }
}

/// Block selector accepted by snapshot queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockNumber {
    /// Current chain head.
    Latest,
    /// Genesis.
    Earliest,
    Number(u64),
}

impl FromStr for BlockNumber {
    type Err = String;

    /// Accepts `latest`, `earliest`, `0x`-prefixed hex or decimal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "latest" => Ok(Self::Latest),
            "earliest" => Ok(Self::Earliest),
            _ => {
                let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                    Some(digits) => u64::from_str_radix(digits, 16),
                    None => s.parse::<u64>(),
                };
                parsed
                    .map(Self::Number)
                    .map_err(|e| format!("invalid block number {s:?}: {e}"))
            }
        }
    }
}

/// Outcome of observing a consensus payload that arrived from a peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InboundVerdict {
    /// First sighting from our side; hand it to the consensus engine.
    Fresh,
    /// This node already gossiped the payload; ignore it.
    AlreadyGossiped,
}

//! Outbound ports (SPI) for the dissemination layer.
//!
//! Every collaborator here is owned by another part of the node: the
//! transport (peers, broadcaster), the proxy subsystem, the validator enode
//! table, the chain database and the snapshot engine. This layer only reads
//! from them, except for the explicit add/remove sentry requests.
//!
//! Collaborators report failures as plain strings; the service maps them into
//! [`DisseminationError`](crate::domain::DisseminationError) at the boundary.

use async_trait::async_trait;
use shared_types::{Address, BlockHeader, Hash, NodeId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::domain::{Enode, PeerPurpose, Snapshot};
use crate::events::MessageEvent;

/// A connected network endpoint.
#[async_trait]
pub trait Peer: Send + Sync {
    fn node_id(&self) -> NodeId;

    /// Validator address derived from the peer's node key.
    fn address(&self) -> Address;

    /// Write one message to the peer's connection.
    async fn send(&self, msg_code: u64, payload: &[u8]) -> Result<(), String>;
}

/// Connected peers keyed by network identity.
pub type PeerMap = HashMap<NodeId, Arc<dyn Peer>>;

/// Peer set owned by the transport layer.
pub trait Broadcaster: Send + Sync {
    /// Connected peers matching `purpose`, restricted to `targets` when given.
    ///
    /// `None` means no identity filtering. An empty target set yields no peers.
    fn find_peers(&self, targets: Option<&HashSet<NodeId>>, purpose: PeerPurpose) -> PeerMap;

    /// Connect to a sentry, even if peer slots are full.
    fn add_sentry_peer(&self, node: &Enode, external: &Enode);

    /// Disconnect a sentry. Unknown nodes are ignored.
    fn remove_sentry_peer(&self, node: &Enode);
}

/// Maps validator addresses to their announced network identities.
pub trait ValidatorEnodeTable: Send + Sync {
    /// `Ok(None)` when the table has no entry for `address`.
    fn node_from_address(&self, address: &Address) -> Result<Option<Enode>, String>;
}

/// Relay path of a proxied validator.
#[async_trait]
pub trait ProxyHandler: Send + Sync {
    /// Ask the sentry to wrap `payload` in a forward envelope for `destinations`.
    async fn send_forward_msg(
        &self,
        destinations: Option<&[Address]>,
        msg_code: u64,
        payload: &[u8],
    ) -> Result<(), String>;
}

/// The node's own consensus event stream.
#[async_trait]
pub trait LocalEventStream: Send + Sync {
    /// Post an event; returns the number of receivers it reached.
    async fn post(&self, event: MessageEvent) -> Result<usize, String>;
}

/// Read access to the canonical header chain.
pub trait ChainReader: Send + Sync {
    fn current_header(&self) -> BlockHeader;

    fn header_by_number(&self, number: u64) -> Option<BlockHeader>;

    fn header_by_hash(&self, hash: &Hash) -> Option<BlockHeader>;
}

/// Computes validator-set snapshots from chain history.
pub trait SnapshotEngine: Send + Sync {
    /// Snapshot valid at block `number` / `hash`.
    ///
    /// `parents` optionally supplies headers not yet in the database.
    fn snapshot(
        &self,
        chain: &dyn ChainReader,
        number: u64,
        hash: Hash,
        parents: Option<&[BlockHeader]>,
    ) -> Result<Snapshot, String>;
}

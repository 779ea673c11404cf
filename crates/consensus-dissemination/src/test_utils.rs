//! Mock collaborators shared by the unit tests.

use async_trait::async_trait;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use parking_lot::{Mutex, RwLock};
use shared_types::{Address, BlockHeader, Hash, NodeId, ValidatorData};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::domain::{Clock, Enode, PeerPurpose, Snapshot};
use crate::events::MessageEvent;
use crate::ports::{
    Broadcaster, ChainReader, LocalEventStream, Peer, PeerMap, ProxyHandler, SnapshotEngine,
    ValidatorEnodeTable,
};

// =============================================================================
// IDENTITIES
// =============================================================================

/// Deterministic secp256k1 public key (X || Y) for `seed`.
pub fn test_public_key(seed: u8) -> [u8; 64] {
    let mut scalar = [0u8; 32];
    scalar[31] = seed.max(1);
    scalar[0] = 0x01;
    let secret = k256::SecretKey::from_slice(&scalar).unwrap();
    let point = secret.public_key().to_encoded_point(false);
    let mut key = [0u8; 64];
    key.copy_from_slice(&point.as_bytes()[1..]);
    key
}

pub fn public_key_hex(seed: u8) -> String {
    hex::encode(test_public_key(seed))
}

pub fn test_enode_url(seed: u8, host_port: &str) -> String {
    format!("enode://{}@{}", public_key_hex(seed), host_port)
}

pub fn test_enode(seed: u8, host_port: &str) -> Enode {
    Enode::parse(&test_enode_url(seed, host_port)).unwrap()
}

/// Let spawned send and delivery tasks run to completion.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(25)).await;
}

// =============================================================================
// CLOCK
// =============================================================================

pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

// =============================================================================
// PEERS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PeerBehavior {
    Deliver,
    Fail,
    Stall,
}

/// Peer that records every message written to it.
pub struct RecordingPeer {
    enode: Enode,
    behavior: PeerBehavior,
    sent: Mutex<Vec<(u64, Vec<u8>)>>,
}

impl RecordingPeer {
    fn build(seed: u8, behavior: PeerBehavior) -> Arc<Self> {
        Arc::new(Self {
            enode: test_enode(seed, &format!("10.0.0.{seed}:30303")),
            behavior,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn new(seed: u8) -> Arc<Self> {
        Self::build(seed, PeerBehavior::Deliver)
    }

    /// Every send returns a transport error.
    pub fn failing(seed: u8) -> Arc<Self> {
        Self::build(seed, PeerBehavior::Fail)
    }

    /// Every send hangs forever.
    pub fn stalled(seed: u8) -> Arc<Self> {
        Self::build(seed, PeerBehavior::Stall)
    }

    pub fn enode(&self) -> &Enode {
        &self.enode
    }

    pub fn validator_address(&self) -> Address {
        self.enode.address()
    }

    pub fn sent(&self) -> Vec<(u64, Vec<u8>)> {
        self.sent.lock().clone()
    }

    pub fn send_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl Peer for RecordingPeer {
    fn node_id(&self) -> NodeId {
        self.enode.id()
    }

    fn address(&self) -> Address {
        self.enode.address()
    }

    async fn send(&self, msg_code: u64, payload: &[u8]) -> Result<(), String> {
        match self.behavior {
            PeerBehavior::Deliver => {
                self.sent.lock().push((msg_code, payload.to_vec()));
                Ok(())
            }
            PeerBehavior::Fail => Err("connection reset by peer".into()),
            PeerBehavior::Stall => {
                std::future::pending::<()>().await;
                Ok(())
            }
        }
    }
}

/// Broadcaster over a fixed peer list.
#[derive(Default)]
pub struct MockBroadcaster {
    peers: RwLock<Vec<(Arc<dyn Peer>, PeerPurpose)>>,
    find_calls: AtomicUsize,
    added_sentries: Mutex<Vec<(Enode, Enode)>>,
    removed_sentries: Mutex<Vec<Enode>>,
}

impl MockBroadcaster {
    pub fn with_peers(peers: impl IntoIterator<Item = Arc<dyn Peer>>) -> Self {
        let broadcaster = Self::default();
        for peer in peers {
            broadcaster.connect(peer, PeerPurpose::Validator);
        }
        broadcaster
    }

    pub fn connect(&self, peer: Arc<dyn Peer>, purpose: PeerPurpose) {
        self.peers.write().push((peer, purpose));
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn added_sentries(&self) -> Vec<(Enode, Enode)> {
        self.added_sentries.lock().clone()
    }

    pub fn removed_sentries(&self) -> Vec<Enode> {
        self.removed_sentries.lock().clone()
    }
}

impl Broadcaster for MockBroadcaster {
    fn find_peers(&self, targets: Option<&HashSet<NodeId>>, purpose: PeerPurpose) -> PeerMap {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.peers
            .read()
            .iter()
            .filter(|(_, p)| purpose == PeerPurpose::Any || *p == purpose)
            .filter(|(peer, _)| targets.map_or(true, |t| t.contains(&peer.node_id())))
            .map(|(peer, _)| (peer.node_id(), peer.clone()))
            .collect()
    }

    fn add_sentry_peer(&self, node: &Enode, external: &Enode) {
        self.added_sentries
            .lock()
            .push((node.clone(), external.clone()));
    }

    fn remove_sentry_peer(&self, node: &Enode) {
        self.removed_sentries.lock().push(node.clone());
    }
}

#[derive(Default)]
pub struct MockEnodeTable {
    entries: RwLock<HashMap<Address, Enode>>,
    failing: RwLock<HashSet<Address>>,
}

impl MockEnodeTable {
    pub fn insert(&self, address: Address, node: Enode) {
        self.entries.write().insert(address, node);
    }

    pub fn fail_on(&self, address: Address) {
        self.failing.write().insert(address);
    }
}

impl ValidatorEnodeTable for MockEnodeTable {
    fn node_from_address(&self, address: &Address) -> Result<Option<Enode>, String> {
        if self.failing.read().contains(address) {
            return Err("enode table unavailable".into());
        }
        Ok(self.entries.read().get(address).cloned())
    }
}

// =============================================================================
// PROXY AND LOCAL DELIVERY
// =============================================================================

pub type ForwardCall = (Option<Vec<Address>>, u64, Vec<u8>);

#[derive(Default)]
pub struct RecordingProxy {
    fail: bool,
    calls: Mutex<Vec<ForwardCall>>,
}

impl RecordingProxy {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<ForwardCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ProxyHandler for RecordingProxy {
    async fn send_forward_msg(
        &self,
        destinations: Option<&[Address]>,
        msg_code: u64,
        payload: &[u8],
    ) -> Result<(), String> {
        self.calls
            .lock()
            .push((destinations.map(<[Address]>::to_vec), msg_code, payload.to_vec()));
        if self.fail {
            return Err("no connected sentry".into());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingEventStream {
    events: Mutex<Vec<MessageEvent>>,
}

impl RecordingEventStream {
    pub fn events(&self) -> Vec<MessageEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl LocalEventStream for RecordingEventStream {
    async fn post(&self, event: MessageEvent) -> Result<usize, String> {
        self.events.lock().push(event);
        Ok(1)
    }
}

// =============================================================================
// CHAIN AND SNAPSHOTS
// =============================================================================

pub fn header(number: u64) -> BlockHeader {
    let mut hash = [0u8; 32];
    hash[..8].copy_from_slice(&number.to_be_bytes());
    hash[31] = 0xFF;
    let mut parent_hash = [0u8; 32];
    if number > 0 {
        parent_hash[..8].copy_from_slice(&(number - 1).to_be_bytes());
        parent_hash[31] = 0xFF;
    }
    BlockHeader {
        number,
        hash,
        parent_hash,
        timestamp: 1_700_000_000 + number,
    }
}

/// Linear chain of headers `0..=head`.
pub struct MockChain {
    headers: Vec<BlockHeader>,
}

impl MockChain {
    pub fn with_head(head: u64) -> Self {
        Self {
            headers: (0..=head).map(header).collect(),
        }
    }
}

impl ChainReader for MockChain {
    fn current_header(&self) -> BlockHeader {
        self.headers.last().cloned().unwrap_or_default()
    }

    fn header_by_number(&self, number: u64) -> Option<BlockHeader> {
        self.headers.get(number as usize).cloned()
    }

    fn header_by_hash(&self, hash: &Hash) -> Option<BlockHeader> {
        self.headers.iter().find(|h| &h.hash == hash).cloned()
    }
}

/// Validator set changes every `epoch` blocks: validator `i` has address `[i; 20]`.
pub struct MockSnapshotEngine {
    epoch: u64,
    fail: bool,
    calls: Mutex<Vec<(u64, Hash)>>,
}

impl MockSnapshotEngine {
    pub fn new(epoch: u64) -> Self {
        Self {
            epoch,
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(1)
        }
    }

    pub fn calls(&self) -> Vec<(u64, Hash)> {
        self.calls.lock().clone()
    }

    pub fn validators_at(&self, number: u64) -> Vec<ValidatorData> {
        let count = 3 + (number / self.epoch) as u8;
        (1..=count)
            .map(|i| ValidatorData {
                address: [i; 20],
                bls_public_key: vec![i; 48],
            })
            .collect()
    }
}

impl SnapshotEngine for MockSnapshotEngine {
    fn snapshot(
        &self,
        _chain: &dyn ChainReader,
        number: u64,
        hash: Hash,
        _parents: Option<&[BlockHeader]>,
    ) -> Result<Snapshot, String> {
        self.calls.lock().push((number, hash));
        if self.fail {
            return Err("snapshot store corrupted".into());
        }
        Ok(Snapshot {
            number,
            hash,
            validators: self.validators_at(number),
        })
    }
}

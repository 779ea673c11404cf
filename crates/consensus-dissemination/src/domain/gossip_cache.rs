//! # Gossip Deduplication Cache
//!
//! Two bounded, time-aware views:
//!
//! - **peer view**: `(peer address, fingerprint)` pairs a peer has sent us or
//!   we have sent to it
//! - **self view**: fingerprints this node has gossiped itself
//!
//! Each view holds at most `max_*_entries` records and evicts the least
//! recently inserted one when full. A record older than `entry_ttl` is
//! reported absent even while still resident. Re-marking a live record is a
//! no-op; re-marking an expired one refreshes it.

use parking_lot::RwLock;
use shared_types::Address;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::{Fingerprint, GossipCacheConfig};

/// Monotonic time source for entry ages.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Default clock backed by `Instant::now`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Insertion-ordered set with capacity and age bounds.
struct SeenSet<K> {
    entries: HashMap<K, Instant>,
    /// Insertion log, oldest first. A record whose instant no longer matches
    /// `entries` belongs to a refreshed key and is skipped.
    order: VecDeque<(K, Instant)>,
    max_entries: usize,
    ttl: Duration,
}

impl<K: Eq + Hash + Clone> SeenSet<K> {
    fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_entries,
            ttl,
        }
    }

    fn contains(&self, key: &K, now: Instant) -> bool {
        self.entries
            .get(key)
            .is_some_and(|inserted| now.saturating_duration_since(*inserted) < self.ttl)
    }

    /// Returns `true` if the key was absent (or expired) and is now recorded.
    fn insert(&mut self, key: K, now: Instant) -> bool {
        if self.contains(&key, now) {
            return false;
        }

        self.prune_expired(now);
        while self.entries.len() >= self.max_entries {
            if !self.evict_oldest() {
                break;
            }
        }

        self.entries.insert(key.clone(), now);
        self.order.push_back((key, now));
        true
    }

    fn prune_expired(&mut self, now: Instant) {
        while let Some((key, inserted)) = self.order.front() {
            if now.saturating_duration_since(*inserted) < self.ttl {
                break;
            }
            if self.entries.get(key) == Some(inserted) {
                self.entries.remove(key);
            }
            self.order.pop_front();
        }
    }

    fn evict_oldest(&mut self) -> bool {
        while let Some((key, inserted)) = self.order.pop_front() {
            if self.entries.get(&key) == Some(&inserted) {
                self.entries.remove(&key);
                return true;
            }
        }
        false
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Bounded record of which payloads were exchanged with which peers.
///
/// All operations take `&self`; each view has its own lock so peer-view
/// traffic never waits on self-view traffic.
pub struct GossipDeduplicationCache {
    peer_view: RwLock<SeenSet<(Address, Fingerprint)>>,
    self_view: RwLock<SeenSet<Fingerprint>>,
    clock: Arc<dyn Clock>,
}

impl GossipDeduplicationCache {
    pub fn new(config: &GossipCacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &GossipCacheConfig, clock: Arc<dyn Clock>) -> Self {
        let ttl = config.entry_ttl();
        Self {
            peer_view: RwLock::new(SeenSet::new(config.max_peer_entries, ttl)),
            self_view: RwLock::new(SeenSet::new(config.max_self_entries, ttl)),
            clock,
        }
    }

    /// Record that this node gossiped `fingerprint`.
    pub fn mark_self(&self, fingerprint: Fingerprint) {
        let now = self.clock.now();
        self.self_view.write().insert(fingerprint, now);
    }

    pub fn has_self_gossiped(&self, fingerprint: &Fingerprint) -> bool {
        let now = self.clock.now();
        self.self_view.read().contains(fingerprint, now)
    }

    /// Record that `peer` sent us, or was sent, `fingerprint`.
    pub fn mark_peer(&self, peer: Address, fingerprint: Fingerprint) {
        let now = self.clock.now();
        self.peer_view.write().insert((peer, fingerprint), now);
    }

    pub fn has_peer_seen(&self, peer: &Address, fingerprint: &Fingerprint) -> bool {
        let now = self.clock.now();
        self.peer_view.read().contains(&(*peer, *fingerprint), now)
    }

    /// Check-and-mark in one critical section.
    ///
    /// Returns `true` exactly once per live `(peer, fingerprint)` record, so
    /// concurrent callers racing on the same pair cannot both win.
    pub fn mark_peer_if_unseen(&self, peer: Address, fingerprint: Fingerprint) -> bool {
        let now = self.clock.now();
        self.peer_view.write().insert((peer, fingerprint), now)
    }

    /// Resident peer-view records, including expired ones not yet pruned.
    pub fn peer_entries(&self) -> usize {
        self.peer_view.read().len()
    }

    /// Resident self-view records, including expired ones not yet pruned.
    pub fn self_entries(&self) -> usize {
        self.self_view.read().len()
    }
}

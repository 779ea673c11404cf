//! # Consensus Message Dissemination
//!
//! Moves BFT consensus messages between validator nodes: targeted multicast,
//! deduplicated gossip, and forwarding through sentry relays when the
//! validator is hidden behind them.
//!
//! ## Architecture Role
//!
//! ```text
//! [Round Engine] ──multicast / gossip──→ [DisseminationService]
//!                                             │
//!                     ┌── Direct ─────────────┼───────── Proxied ──┐
//!                     ↓                       │                    ↓
//!          [PeerResolver] → peer tasks        │          [ProxyHandler] → sentry
//!                                             ↓ send_to_self
//!                                     [LocalEventStream] ──→ [Round Engine]
//!
//! [RPC] ──get_snapshot / add_sentry──→ [ValidatorApi] ──→ [SnapshotEngine]
//! ```
//!
//! ## Guarantees
//!
//! - A gossip payload reaches each peer at most once while its cache entry
//!   is live, including peers that sent it to us first.
//! - A proxied node never sends consensus traffic to peers directly.
//! - Self-delivery always carries the bare payload.
//! - A slow or failing peer never delays the caller or other peers.

pub mod adapters;
pub mod api;
pub mod domain;
pub mod events;
pub mod metrics;
pub mod ports;
pub mod service;

#[cfg(test)]
mod test_utils;

pub use adapters::{InMemoryEventMux, PeerResolver};
pub use api::ValidatorApi;
pub use domain::*;
pub use events::MessageEvent;
pub use ports::inbound::{MessageDispatcherApi, SentryManagementApi};
pub use service::{DisseminationDependencies, DisseminationService};

//! Adapters for the dissemination ports.
//!
//! - `event_mux`: in-memory `LocalEventStream` backed by a broadcast channel
//! - `peer_resolver`: address → connected-peer lookup over the enode table

pub mod event_mux;
pub mod peer_resolver;

pub use event_mux::InMemoryEventMux;
pub use peer_resolver::PeerResolver;

//! # Domain Layer for Message Dissemination
//!
//! Pure logic with no I/O. This is the innermost layer of the hexagonal
//! architecture.
//!
//! ## Contents
//!
//! - **entities**: `DeliveryIntent`, `SentryRelationship`, `Snapshot`, `BlockNumber`
//! - **enode**: v4 node URL parsing and identity derivation
//! - **error**: `DisseminationError` taxonomy
//! - **gossip_cache**: bounded, TTL-aware `GossipDeduplicationCache`
//! - **sentry**: `SentryRegistry`
//! - **services**: Keccak hashing, payload `Fingerprint`
//! - **value_objects**: `DisseminationConfig`, `DeliveryMode`

mod entities;
mod enode;
mod error;
mod gossip_cache;
mod sentry;
mod services;
mod value_objects;

pub use entities::*;
pub use enode::*;
pub use error::*;
pub use gossip_cache::*;
pub use sentry::*;
pub use services::*;
pub use value_objects::*;

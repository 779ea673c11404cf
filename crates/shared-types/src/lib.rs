//! # Shared Types Crate
//!
//! Chain-level primitives used across the validator node.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identities and headers are defined once here.
//! - **Consensus vs Network Identity**: a validator's `Address` is derived from
//!   its signing key and is stable; a `NodeId` names a transient network
//!   endpoint. The two are never interchangeable.

pub mod entities;

pub use entities::*;

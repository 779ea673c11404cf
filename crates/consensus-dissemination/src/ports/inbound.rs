//! Inbound ports (API) for the dissemination layer.

use async_trait::async_trait;
use shared_types::Address;
use std::sync::Arc;

use crate::domain::{DisseminationResult, InboundVerdict, SentryRelationship};

/// Outbound consensus messaging, called by the round engine.
#[async_trait]
pub trait MessageDispatcherApi: Send + Sync {
    /// Send `payload` to the validators in `destinations`.
    ///
    /// `None` targets every connected peer. A proxied node hands the message
    /// to its sentry instead and returns any forwarding error. With
    /// `send_to_self`, the bare payload is also posted to the local event
    /// stream, whatever the network outcome.
    async fn multicast(
        &self,
        destinations: Option<Vec<Address>>,
        payload: Arc<[u8]>,
        msg_code: u64,
        send_to_self: bool,
    ) -> DisseminationResult<()>;

    /// Flood `payload` to every connected peer that has not already
    /// exchanged it with us.
    async fn gossip(&self, payload: Arc<[u8]>, msg_code: u64) -> DisseminationResult<()>;

    /// Record a payload received from `peer`.
    ///
    /// Called from the receive path before the payload reaches consensus.
    fn observe_peer_message(&self, peer: Address, payload: &[u8]) -> InboundVerdict;
}

/// Operator control of sentry relays.
pub trait SentryManagementApi: Send + Sync {
    /// Peer with a remote node acting as sentry, even if slots are full.
    ///
    /// Fails with `NotProxied` on a direct node and with `MalformedIdentity`
    /// if either URL does not parse.
    fn add_sentry(&self, url: &str, external_url: &str) -> DisseminationResult<bool>;

    /// Stop using a node as sentry. Succeeds even if it was never added.
    fn remove_sentry(&self, url: &str) -> DisseminationResult<bool>;

    fn sentries(&self) -> Vec<SentryRelationship>;
}

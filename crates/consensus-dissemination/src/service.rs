//! # Dissemination Service
//!
//! The message dispatcher of a validator node.
//!
//! ## Delivery Paths
//!
//! ```text
//!                    multicast(dest, payload, code, to_self)
//!                                   │
//!                ┌──────── mode ────┴──────────┐
//!                ↓ Proxied                     ↓ Direct
//!     [ProxyHandler::send_forward_msg]   [PeerResolver] ─→ send_msg ─→ peer tasks
//!                │                             │
//!                └──────────────┬──────────────┘
//!                               ↓ to_self (always, unwrapped payload)
//!                       [LocalEventStream::post]
//! ```
//!
//! `gossip` floods every connected peer except those the
//! [`GossipDeduplicationCache`] says already exchanged the payload with us.
//!
//! ## Concurrency
//!
//! Every peer send and every self-delivery runs as its own Tokio task. The
//! caller never waits on a peer's transport; a failing or stalled peer only
//! affects its own task. Per-peer failures are logged, never returned.

use async_trait::async_trait;
use shared_types::Address;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, error, info, trace, warn, Instrument, Span};

use crate::adapters::PeerResolver;
use crate::domain::{
    Clock, DeliveryIntent, DeliveryMode, DisseminationConfig, DisseminationError,
    DisseminationResult, Enode, Fingerprint, GossipCacheConfig, GossipDeduplicationCache,
    InboundVerdict, SentryRegistry, SentryRelationship,
};
use crate::events::MessageEvent;
use crate::metrics;
use crate::ports::{
    Broadcaster, LocalEventStream, MessageDispatcherApi, Peer, ProxyHandler, SentryManagementApi,
    ValidatorEnodeTable,
};

/// Outbound route, fixed at construction.
enum Route {
    Direct,
    Proxied(Arc<dyn ProxyHandler>),
}

/// Dependencies for [`DisseminationService`].
pub struct DisseminationDependencies<B, T, E> {
    pub broadcaster: Arc<B>,
    pub enode_table: Arc<T>,
    pub event_stream: Arc<E>,
    /// Required in proxied mode, ignored in direct mode.
    pub proxy_handler: Option<Arc<dyn ProxyHandler>>,
    pub config: DisseminationConfig,
}

/// Message dispatcher and sentry manager.
///
/// Thread-safe; share it across tasks behind an `Arc`.
pub struct DisseminationService<B, T, E>
where
    B: Broadcaster,
    T: ValidatorEnodeTable,
    E: LocalEventStream,
{
    route: Route,
    resolver: PeerResolver<B, T>,
    event_stream: Arc<E>,
    cache_config: GossipCacheConfig,
    gossip_cache: GossipDeduplicationCache,
    sentries: SentryRegistry,
    span: Span,
}

impl<B, T, E> DisseminationService<B, T, E>
where
    B: Broadcaster + 'static,
    T: ValidatorEnodeTable + 'static,
    E: LocalEventStream + 'static,
{
    pub fn new(deps: DisseminationDependencies<B, T, E>) -> DisseminationResult<Self> {
        let config = deps.config;
        config.validate()?;

        let route = match (config.mode, deps.proxy_handler) {
            (DeliveryMode::Proxied, Some(handler)) => Route::Proxied(handler),
            (DeliveryMode::Proxied, None) => {
                return Err(DisseminationError::Configuration(
                    "proxied mode requires a proxy handler".into(),
                ))
            }
            (DeliveryMode::Direct, _) => Route::Direct,
        };

        Ok(Self {
            route,
            resolver: PeerResolver::new(deps.broadcaster, deps.enode_table),
            event_stream: deps.event_stream,
            gossip_cache: GossipDeduplicationCache::new(&config.gossip_cache),
            cache_config: config.gossip_cache,
            sentries: SentryRegistry::new(config.mode),
            span: tracing::info_span!("dissemination", mode = ?config.mode),
        })
    }

    /// Use the caller's span as the parent of every event and send task.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Set a custom clock for cache ages (for testing). Clears the cache.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.gossip_cache = GossipDeduplicationCache::with_clock(&self.cache_config, clock);
        self
    }

    pub fn mode(&self) -> DeliveryMode {
        self.sentries.mode()
    }

    pub fn gossip_cache(&self) -> &GossipDeduplicationCache {
        &self.gossip_cache
    }

    /// Dispatch `payload` to each peer without waiting for any of them.
    ///
    /// Succeeds once every send task is spawned. Must run inside a Tokio
    /// runtime; outside one nothing is dispatched and a configuration error
    /// is returned.
    pub fn send_msg<I>(&self, peers: I, payload: Arc<[u8]>, msg_code: u64) -> DisseminationResult<()>
    where
        I: IntoIterator<Item = Arc<dyn Peer>>,
    {
        let handle = Handle::try_current()
            .map_err(|e| DisseminationError::Configuration(format!("no async runtime: {e}")))?;

        let mut dispatched = 0usize;
        for peer in peers {
            trace!(parent: &self.span, peer = %peer.node_id(), msg_code, "Sending consensus message to peer");
            let payload = payload.clone();
            handle.spawn(
                async move {
                    if let Err(e) = peer.send(msg_code, &payload).await {
                        metrics::record_peer_send_failure();
                        debug!(peer = %peer.node_id(), msg_code, error = %e, "Peer send failed");
                    }
                }
                .instrument(self.span.clone()),
            );
            dispatched += 1;
        }

        metrics::record_peer_sends(dispatched);
        trace!(parent: &self.span, peers = dispatched, msg_code, "Dispatched consensus message");
        Ok(())
    }

    /// Post the bare payload to the local event stream in the background.
    fn deliver_to_self(&self, payload: Arc<[u8]>) {
        let Ok(handle) = Handle::try_current() else {
            warn!(parent: &self.span, "No async runtime, dropping self delivery");
            return;
        };

        let stream = self.event_stream.clone();
        handle.spawn(
            async move {
                match stream.post(MessageEvent { payload }).await {
                    Ok(receivers) => trace!(receivers, "Delivered message to self"),
                    Err(e) => debug!(error = %e, "Self delivery failed"),
                }
            }
            .instrument(self.span.clone()),
        );
        metrics::record_self_delivery();
    }

    async fn deliver(&self, intent: DeliveryIntent) -> DisseminationResult<()> {
        let destinations = intent.destinations.as_deref();

        let result = match &self.route {
            Route::Proxied(proxy) => proxy
                .send_forward_msg(destinations, intent.msg_code, &intent.payload)
                .await
                .map_err(|e| {
                    metrics::record_forward_failure();
                    warn!(parent: &self.span, msg_code = intent.msg_code, error = %e, "Forwarding through sentry failed");
                    DisseminationError::ForwardingFailure(e)
                }),
            Route::Direct => {
                let peers = self.resolver.resolve(destinations);
                if peers.is_empty() {
                    trace!(parent: &self.span, msg_code = intent.msg_code, "No connected destination peers");
                    Ok(())
                } else {
                    self.send_msg(peers.into_values(), intent.payload.clone(), intent.msg_code)
                }
            }
        };

        if intent.send_to_self {
            self.deliver_to_self(intent.payload);
        }

        result
    }

    fn parse_enode(&self, url: &str) -> DisseminationResult<Enode> {
        Enode::parse(url).map_err(|e| DisseminationError::MalformedIdentity {
            input: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl<B, T, E> MessageDispatcherApi for DisseminationService<B, T, E>
where
    B: Broadcaster + 'static,
    T: ValidatorEnodeTable + 'static,
    E: LocalEventStream + 'static,
{
    async fn multicast(
        &self,
        destinations: Option<Vec<Address>>,
        payload: Arc<[u8]>,
        msg_code: u64,
        send_to_self: bool,
    ) -> DisseminationResult<()> {
        self.deliver(DeliveryIntent::new(destinations, payload, msg_code, send_to_self))
            .await
    }

    async fn gossip(&self, payload: Arc<[u8]>, msg_code: u64) -> DisseminationResult<()> {
        let fingerprint = Fingerprint::of(&payload);
        let peers = self.resolver.connected_peers();
        let connected = peers.len();

        // Recognize the payload if a peer echoes it back to us.
        self.gossip_cache.mark_self(fingerprint);

        let mut targets: Vec<Arc<dyn Peer>> = Vec::with_capacity(connected);
        for peer in peers.into_values() {
            if self.gossip_cache.mark_peer_if_unseen(peer.address(), fingerprint) {
                targets.push(peer);
            } else {
                trace!(parent: &self.span, peer = %peer.node_id(), %fingerprint, "Peer already has this gossip, skipping");
            }
        }

        metrics::record_gossip_suppressed(connected - targets.len());
        self.send_msg(targets, payload, msg_code)
    }

    fn observe_peer_message(&self, peer: Address, payload: &[u8]) -> InboundVerdict {
        let fingerprint = Fingerprint::of(payload);
        self.gossip_cache.mark_peer(peer, fingerprint);

        if self.gossip_cache.has_self_gossiped(&fingerprint) {
            trace!(parent: &self.span, %fingerprint, "Ignoring message this node already gossiped");
            InboundVerdict::AlreadyGossiped
        } else {
            InboundVerdict::Fresh
        }
    }
}

impl<B, T, E> SentryManagementApi for DisseminationService<B, T, E>
where
    B: Broadcaster + 'static,
    T: ValidatorEnodeTable + 'static,
    E: LocalEventStream + 'static,
{
    fn add_sentry(&self, url: &str, external_url: &str) -> DisseminationResult<bool> {
        if !self.mode().is_proxied() {
            error!(parent: &self.span, "Add sentry node failed: this node is not configured to be proxied");
            return Err(DisseminationError::NotProxied);
        }

        let node = self.parse_enode(url)?;
        let external = self.parse_enode(external_url)?;

        self.sentries.register(SentryRelationship {
            node: node.clone(),
            external: external.clone(),
        })?;
        self.resolver.broadcaster().add_sentry_peer(&node, &external);

        info!(parent: &self.span, sentry = %node.id(), external = %external, "Added sentry");
        Ok(true)
    }

    fn remove_sentry(&self, url: &str) -> DisseminationResult<bool> {
        let node = self.parse_enode(url)?;

        if self.sentries.unregister(&node.id()).is_some() {
            info!(parent: &self.span, sentry = %node.id(), "Removed sentry");
        }
        self.resolver.broadcaster().remove_sentry_peer(&node);
        Ok(true)
    }

    fn sentries(&self) -> Vec<SentryRelationship> {
        self.sentries.sentries()
    }
}

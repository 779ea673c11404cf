//! Value objects for dissemination configuration.

use serde::Deserialize;
use std::time::Duration;

use super::{DisseminationError, DisseminationResult};

/// How outbound consensus messages leave this node.
///
/// Resolved once at construction; a node never switches modes while running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Send straight to connected validator peers.
    #[default]
    Direct,
    /// Hidden validator: every multicast goes through a sentry relay.
    Proxied,
}

impl DeliveryMode {
    pub fn is_proxied(&self) -> bool {
        matches!(self, Self::Proxied)
    }
}

/// Bounds for the gossip deduplication cache.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GossipCacheConfig {
    /// Maximum (peer, fingerprint) records before least-recently-inserted eviction.
    pub max_peer_entries: usize,
    /// Maximum self-gossiped fingerprints before least-recently-inserted eviction.
    pub max_self_entries: usize,
    /// Age after which a record counts as absent.
    pub entry_ttl_secs: u64,
}

impl Default for GossipCacheConfig {
    fn default() -> Self {
        Self {
            // 40 tracked peers x 1024 recent messages each.
            max_peer_entries: 40 * 1024,
            max_self_entries: 1024,
            entry_ttl_secs: 300,
        }
    }
}

impl GossipCacheConfig {
    /// Small bounds for unit tests.
    pub fn for_testing() -> Self {
        Self {
            max_peer_entries: 8,
            max_self_entries: 4,
            entry_ttl_secs: 10,
        }
    }

    pub fn entry_ttl(&self) -> Duration {
        Duration::from_secs(self.entry_ttl_secs)
    }

    pub fn validate(&self) -> DisseminationResult<()> {
        if self.max_peer_entries == 0 || self.max_self_entries == 0 {
            return Err(DisseminationError::Configuration(
                "gossip cache capacities must be non-zero".into(),
            ));
        }
        if self.entry_ttl_secs == 0 {
            return Err(DisseminationError::Configuration(
                "gossip cache entry_ttl_secs must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Dissemination layer configuration.
///
/// # Example
///
/// ```toml
/// mode = "proxied"
/// event_channel_capacity = 256
///
/// [gossip_cache]
/// max_peer_entries = 4096
/// entry_ttl_secs = 120
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisseminationConfig {
    pub mode: DeliveryMode,
    pub gossip_cache: GossipCacheConfig,
    /// Buffer size of the in-memory local event mux.
    pub event_channel_capacity: usize,
}

impl Default for DisseminationConfig {
    fn default() -> Self {
        Self {
            mode: DeliveryMode::Direct,
            gossip_cache: GossipCacheConfig::default(),
            event_channel_capacity: 1000,
        }
    }
}

impl DisseminationConfig {
    /// Direct-mode config with test-sized cache bounds.
    pub fn for_testing() -> Self {
        Self {
            mode: DeliveryMode::Direct,
            gossip_cache: GossipCacheConfig::for_testing(),
            event_channel_capacity: 16,
        }
    }

    /// Builder method: set the delivery mode.
    pub fn with_mode(mut self, mode: DeliveryMode) -> Self {
        self.mode = mode;
        self
    }

    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(input: &str) -> DisseminationResult<Self> {
        let config: Self =
            toml::from_str(input).map_err(|e| DisseminationError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DisseminationResult<()> {
        if self.event_channel_capacity == 0 {
            return Err(DisseminationError::Configuration(
                "event_channel_capacity must be non-zero".into(),
            ));
        }
        self.gossip_cache.validate()
    }
}

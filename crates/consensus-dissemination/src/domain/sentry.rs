//! Sentry relay registry.
//!
//! A relationship may exist only while the owning node is proxied. The mode
//! is fixed at construction, so a registry built for a direct node stays
//! empty for its whole lifetime.

use parking_lot::RwLock;
use shared_types::NodeId;
use std::collections::BTreeMap;

use super::{DeliveryMode, DisseminationError, DisseminationResult, SentryRelationship};

pub struct SentryRegistry {
    mode: DeliveryMode,
    sentries: RwLock<BTreeMap<NodeId, SentryRelationship>>,
}

impl SentryRegistry {
    pub fn new(mode: DeliveryMode) -> Self {
        Self {
            mode,
            sentries: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    /// Register (or replace) the relationship keyed by the internal node ID.
    ///
    /// Returns the relationship it replaced, if any.
    pub fn register(
        &self,
        relationship: SentryRelationship,
    ) -> DisseminationResult<Option<SentryRelationship>> {
        if !self.mode.is_proxied() {
            return Err(DisseminationError::NotProxied);
        }
        let id = relationship.node.id();
        Ok(self.sentries.write().insert(id, relationship))
    }

    /// Drop the relationship for `id`. Absent entries are not an error.
    pub fn unregister(&self, id: &NodeId) -> Option<SentryRelationship> {
        self.sentries.write().remove(id)
    }

    pub fn get(&self, id: &NodeId) -> Option<SentryRelationship> {
        self.sentries.read().get(id).cloned()
    }

    /// Current relationships ordered by internal node ID.
    pub fn sentries(&self) -> Vec<SentryRelationship> {
        self.sentries.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.sentries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentries.read().is_empty()
    }
}

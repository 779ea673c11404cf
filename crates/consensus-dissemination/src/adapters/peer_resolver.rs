//! Validator address → connected peer resolution.
//!
//! Combines the validator enode table (address → node) with the broadcaster's
//! live peer set (node → peer). Addresses without a table entry, or whose
//! node is not connected, silently fall out of the result.

use shared_types::{address_to_hex, Address, NodeId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::trace;

use crate::domain::PeerPurpose;
use crate::ports::{Broadcaster, PeerMap, ValidatorEnodeTable};

pub struct PeerResolver<B, T>
where
    B: Broadcaster,
    T: ValidatorEnodeTable,
{
    broadcaster: Arc<B>,
    enode_table: Arc<T>,
}

impl<B, T> PeerResolver<B, T>
where
    B: Broadcaster,
    T: ValidatorEnodeTable,
{
    pub fn new(broadcaster: Arc<B>, enode_table: Arc<T>) -> Self {
        Self {
            broadcaster,
            enode_table,
        }
    }

    pub fn broadcaster(&self) -> &Arc<B> {
        &self.broadcaster
    }

    /// Peers for `destinations`; `None` means every connected peer.
    pub fn resolve(&self, destinations: Option<&[Address]>) -> PeerMap {
        match destinations {
            None => self.connected_peers(),
            Some(addresses) => {
                let targets = self.target_ids(addresses);
                self.broadcaster.find_peers(Some(&targets), PeerPurpose::Any)
            }
        }
    }

    /// Every connected peer, whatever its purpose.
    pub fn connected_peers(&self) -> PeerMap {
        self.broadcaster.find_peers(None, PeerPurpose::Any)
    }

    fn target_ids(&self, addresses: &[Address]) -> HashSet<NodeId> {
        addresses
            .iter()
            .filter_map(|address| match self.enode_table.node_from_address(address) {
                Ok(Some(node)) => Some(node.id()),
                Ok(None) => {
                    trace!(address = %address_to_hex(address), "No enode entry for validator");
                    None
                }
                Err(e) => {
                    trace!(address = %address_to_hex(address), error = %e, "Enode lookup failed");
                    None
                }
            })
            .collect()
    }
}

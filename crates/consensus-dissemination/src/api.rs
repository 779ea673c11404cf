//! Read-only validator queries and sentry administration.
//!
//! Resolves a block header through the chain reader and asks the snapshot
//! engine for the validator set valid at it. Holds no dissemination logic.

use shared_types::{separate_validator_data, Address, BlockHeader, Hash};
use std::sync::Arc;
use tracing::debug;

use crate::domain::{
    BlockNumber, DisseminationError, DisseminationResult, SentryRelationship, Snapshot,
};
use crate::ports::{ChainReader, SentryManagementApi, SnapshotEngine};

pub struct ValidatorApi<C, S, M>
where
    C: ChainReader,
    S: SnapshotEngine,
    M: SentryManagementApi,
{
    chain: Arc<C>,
    engine: Arc<S>,
    sentries: Arc<M>,
}

impl<C, S, M> ValidatorApi<C, S, M>
where
    C: ChainReader,
    S: SnapshotEngine,
    M: SentryManagementApi,
{
    pub fn new(chain: Arc<C>, engine: Arc<S>, sentries: Arc<M>) -> Self {
        Self {
            chain,
            engine,
            sentries,
        }
    }

    /// Snapshot at `number`; `None` means the current head.
    pub fn get_snapshot(&self, number: Option<BlockNumber>) -> DisseminationResult<Snapshot> {
        let header = self.header_by_selector(number)?;
        self.snapshot_at(&header)
    }

    pub fn get_snapshot_at_hash(&self, hash: Hash) -> DisseminationResult<Snapshot> {
        let header = self
            .chain
            .header_by_hash(&hash)
            .ok_or(DisseminationError::UnknownBlock)?;
        self.snapshot_at(&header)
    }

    /// Signing addresses of the validators at `number`, in snapshot order.
    pub fn get_validators(&self, number: Option<BlockNumber>) -> DisseminationResult<Vec<Address>> {
        let snapshot = self.get_snapshot(number)?;
        let (addresses, _) = separate_validator_data(snapshot.validators());
        Ok(addresses)
    }

    pub fn get_validators_at_hash(&self, hash: Hash) -> DisseminationResult<Vec<Address>> {
        let snapshot = self.get_snapshot_at_hash(hash)?;
        let (addresses, _) = separate_validator_data(snapshot.validators());
        Ok(addresses)
    }

    pub fn add_sentry(&self, url: &str, external_url: &str) -> DisseminationResult<bool> {
        self.sentries.add_sentry(url, external_url)
    }

    pub fn remove_sentry(&self, url: &str) -> DisseminationResult<bool> {
        self.sentries.remove_sentry(url)
    }

    pub fn sentries(&self) -> Vec<SentryRelationship> {
        self.sentries.sentries()
    }

    fn header_by_selector(&self, number: Option<BlockNumber>) -> DisseminationResult<BlockHeader> {
        let header = match number.unwrap_or(BlockNumber::Latest) {
            BlockNumber::Latest => Some(self.chain.current_header()),
            BlockNumber::Earliest => self.chain.header_by_number(0),
            BlockNumber::Number(n) => self.chain.header_by_number(n),
        };
        header.ok_or(DisseminationError::UnknownBlock)
    }

    fn snapshot_at(&self, header: &BlockHeader) -> DisseminationResult<Snapshot> {
        self.engine
            .snapshot(&*self.chain, header.number, header.hash, None)
            .map_err(|e| {
                debug!(number = header.number, error = %e, "Snapshot lookup failed");
                DisseminationError::Snapshot(e)
            })
    }
}

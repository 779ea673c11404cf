//! In-memory local event stream.
//!
//! Uses `tokio::sync::broadcast` so the consensus engine and any number of
//! observers can subscribe. Posting with no subscribers drops the event.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::domain::{DisseminationConfig, DisseminationError, DisseminationResult};
use crate::events::MessageEvent;
use crate::ports::LocalEventStream;

pub struct InMemoryEventMux {
    sender: broadcast::Sender<MessageEvent>,
    events_posted: AtomicU64,
    capacity: usize,
}

impl InMemoryEventMux {
    /// Mux buffering up to `capacity` events per subscriber.
    ///
    /// Fails on a zero capacity.
    pub fn with_capacity(capacity: usize) -> DisseminationResult<Self> {
        if capacity == 0 {
            return Err(DisseminationError::Configuration(
                "event channel capacity must be non-zero".into(),
            ));
        }
        let (sender, _) = broadcast::channel(capacity);
        Ok(Self {
            sender,
            events_posted: AtomicU64::new(0),
            capacity,
        })
    }

    pub fn from_config(config: &DisseminationConfig) -> DisseminationResult<Self> {
        Self::with_capacity(config.event_channel_capacity)
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<MessageEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total post attempts, delivered or not.
    pub fn events_posted(&self) -> u64 {
        self.events_posted.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl LocalEventStream for InMemoryEventMux {
    async fn post(&self, event: MessageEvent) -> Result<usize, String> {
        self.events_posted.fetch_add(1, Ordering::Relaxed);
        let len = event.payload.len();

        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(receivers, payload_len = len, "Message event posted");
                Ok(receivers)
            }
            Err(_) => {
                warn!(payload_len = len, "Message event dropped (no receivers)");
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_post_without_subscribers() {
        let mux = InMemoryEventMux::with_capacity(4).unwrap();
        let receivers = mux.post(MessageEvent::new(vec![1u8])).await.unwrap();
        assert_eq!(receivers, 0);
        assert_eq!(mux.events_posted(), 1);
    }

    #[tokio::test]
    async fn test_post_reaches_every_subscriber() {
        let mux = InMemoryEventMux::with_capacity(4).unwrap();
        let mut first = mux.subscribe();
        let mut second = mux.subscribe();

        let event = MessageEvent::new(vec![7u8, 7]);
        assert_eq!(mux.post(event.clone()).await.unwrap(), 2);

        assert_eq!(first.recv().await.unwrap(), event);
        assert_eq!(second.recv().await.unwrap(), event);
        assert_eq!(mux.subscriber_count(), 2);
    }

    #[test]
    fn test_capacity() {
        assert_eq!(InMemoryEventMux::with_capacity(32).unwrap().capacity(), 32);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            InMemoryEventMux::with_capacity(0),
            Err(DisseminationError::Configuration(_))
        ));
    }

    #[test]
    fn test_from_config_uses_channel_capacity() {
        let config = DisseminationConfig::for_testing();
        let mux = InMemoryEventMux::from_config(&config).unwrap();
        assert_eq!(mux.capacity(), config.event_channel_capacity);

        let zero = DisseminationConfig {
            event_channel_capacity: 0,
            ..DisseminationConfig::for_testing()
        };
        assert!(InMemoryEventMux::from_config(&zero).is_err());
    }
}

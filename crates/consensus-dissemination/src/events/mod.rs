//! Events posted to the node's local consensus event stream.

use std::sync::Arc;

/// A consensus payload delivered to this node's own round engine.
///
/// Always carries the bare payload, never a sentry forwarding envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageEvent {
    pub payload: Arc<[u8]>,
}

impl MessageEvent {
    pub fn new(payload: impl Into<Arc<[u8]>>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

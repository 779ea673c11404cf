//! Error types for the dissemination layer.
//!
//! Per-peer transport failures never appear here: they are absorbed by the
//! fan-out and only logged.

/// Dissemination error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisseminationError {
    #[error("unknown block")]
    UnknownBlock,

    #[error("invalid enode {input:?}: {reason}")]
    MalformedIdentity { input: String, reason: String },

    #[error("can't manage sentries for a node that is not configured to be proxied")]
    NotProxied,

    #[error("forwarding through sentry failed: {0}")]
    ForwardingFailure(String),

    #[error("snapshot retrieval failed: {0}")]
    Snapshot(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl DisseminationError {
    /// JSON-RPC error code for the query surface.
    ///
    /// Caller mistakes map to the "invalid params" range, everything else to
    /// the server-error range.
    pub fn rpc_code(&self) -> i64 {
        match self {
            Self::UnknownBlock => -32001,
            Self::MalformedIdentity { .. } => -32602,
            Self::NotProxied => -32003,
            Self::ForwardingFailure(_) => -32010,
            Self::Snapshot(_) => -32000,
            Self::Configuration(_) => -32603,
        }
    }
}

/// Result type for dissemination operations.
pub type DisseminationResult<T> = Result<T, DisseminationError>;

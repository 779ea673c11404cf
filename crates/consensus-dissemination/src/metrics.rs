//! # Dissemination Metrics
//!
//! Prometheus counters for outbound consensus traffic.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! consensus-dissemination = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `dissemination_peer_sends_total` - Per-peer sends dispatched
//! - `dissemination_peer_send_failures_total` - Per-peer sends the transport rejected
//! - `dissemination_gossip_suppressed_total` - Gossip targets skipped as already seen
//! - `dissemination_forward_failures_total` - Sentry forwarding errors
//! - `dissemination_self_deliveries_total` - Payloads posted to the local event stream

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, IntCounter};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref PEER_SENDS: IntCounter = register_int_counter!(
        "dissemination_peer_sends_total",
        "Total number of per-peer sends dispatched"
    )
    .expect("Failed to create PEER_SENDS metric");

    pub static ref PEER_SEND_FAILURES: IntCounter = register_int_counter!(
        "dissemination_peer_send_failures_total",
        "Total number of per-peer sends rejected by the transport"
    )
    .expect("Failed to create PEER_SEND_FAILURES metric");

    pub static ref GOSSIP_SUPPRESSED: IntCounter = register_int_counter!(
        "dissemination_gossip_suppressed_total",
        "Total number of gossip targets skipped because they already had the payload"
    )
    .expect("Failed to create GOSSIP_SUPPRESSED metric");

    pub static ref FORWARD_FAILURES: IntCounter = register_int_counter!(
        "dissemination_forward_failures_total",
        "Total number of sentry forwarding failures"
    )
    .expect("Failed to create FORWARD_FAILURES metric");

    pub static ref SELF_DELIVERIES: IntCounter = register_int_counter!(
        "dissemination_self_deliveries_total",
        "Total number of payloads posted to the local event stream"
    )
    .expect("Failed to create SELF_DELIVERIES metric");
}

#[cfg(feature = "metrics")]
pub fn record_peer_sends(count: usize) {
    PEER_SENDS.inc_by(count as u64);
}

#[cfg(feature = "metrics")]
pub fn record_peer_send_failure() {
    PEER_SEND_FAILURES.inc();
}

#[cfg(feature = "metrics")]
pub fn record_gossip_suppressed(count: usize) {
    GOSSIP_SUPPRESSED.inc_by(count as u64);
}

#[cfg(feature = "metrics")]
pub fn record_forward_failure() {
    FORWARD_FAILURES.inc();
}

#[cfg(feature = "metrics")]
pub fn record_self_delivery() {
    SELF_DELIVERIES.inc();
}

// No-op implementations when metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn record_peer_sends(_count: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn record_peer_send_failure() {}

#[cfg(not(feature = "metrics"))]
pub fn record_gossip_suppressed(_count: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn record_forward_failure() {}

#[cfg(not(feature = "metrics"))]
pub fn record_self_delivery() {}

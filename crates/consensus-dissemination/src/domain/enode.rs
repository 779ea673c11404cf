//! # Enode Network Identities
//!
//! Parsing and rendering of v4 node URLs:
//!
//! ```text
//! enode://<128 hex chars: uncompressed secp256k1 key without 0x04>@<ip>:<tcp port>[?discport=<udp port>]
//! ```
//!
//! The node ID is the Keccak-256 hash of the 64-byte key. IPv6 hosts use the
//! bracketed form (`[::1]:30303`). Host names are not resolved.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use shared_types::{Address, NodeId};

use super::services::{address_from_public_key, node_id_from_public_key};

/// URL scheme of a v4 node record.
pub const ENODE_SCHEME: &str = "enode://";

/// Reasons an enode URL can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnodeParseError {
    #[error("missing 'enode://' scheme")]
    MissingScheme,

    #[error("missing '@host:port' part")]
    MissingHost,

    #[error("invalid node id: {0}")]
    InvalidNodeId(String),

    #[error("public key is not a point on secp256k1")]
    InvalidPublicKey,

    #[error("invalid host address: {0}")]
    InvalidAddress(String),

    #[error("invalid discport: {0}")]
    InvalidDiscoveryPort(String),
}

/// A parsed v4 node record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enode {
    public_key: [u8; 64],
    id: NodeId,
    ip: IpAddr,
    tcp_port: u16,
    udp_port: u16,
}

impl Enode {
    /// Parse an `enode://` URL.
    pub fn parse(input: &str) -> Result<Self, EnodeParseError> {
        let rest = input
            .trim()
            .strip_prefix(ENODE_SCHEME)
            .ok_or(EnodeParseError::MissingScheme)?;

        let (id_hex, location) = rest.split_once('@').ok_or(EnodeParseError::MissingHost)?;
        let public_key = parse_public_key(id_hex)?;

        let (host_port, query) = match location.split_once('?') {
            Some((host_port, query)) => (host_port, Some(query)),
            None => (location, None),
        };

        let socket: SocketAddr = host_port
            .parse()
            .map_err(|e: std::net::AddrParseError| {
                EnodeParseError::InvalidAddress(format!("{host_port}: {e}"))
            })?;

        let udp_port = match query {
            Some(query) => parse_discovery_port(query)?.unwrap_or(socket.port()),
            None => socket.port(),
        };

        Ok(Self {
            id: node_id_from_public_key(&public_key),
            public_key,
            ip: socket.ip(),
            tcp_port: socket.port(),
            udp_port,
        })
    }

    /// Network identity of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Address derived from the node key.
    pub fn address(&self) -> Address {
        address_from_public_key(&self.public_key)
    }

    /// Uncompressed public key without the `0x04` prefix.
    pub fn public_key(&self) -> &[u8; 64] {
        &self.public_key
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    pub fn tcp_port(&self) -> u16 {
        self.tcp_port
    }

    pub fn udp_port(&self) -> u16 {
        self.udp_port
    }
}

impl FromStr for Enode {
    type Err = EnodeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Enode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}@{}",
            ENODE_SCHEME,
            hex::encode(self.public_key),
            SocketAddr::new(self.ip, self.tcp_port)
        )?;
        if self.udp_port != self.tcp_port {
            write!(f, "?discport={}", self.udp_port)?;
        }
        Ok(())
    }
}

fn parse_public_key(id_hex: &str) -> Result<[u8; 64], EnodeParseError> {
    let bytes = hex::decode(id_hex).map_err(|e| EnodeParseError::InvalidNodeId(e.to_string()))?;
    if bytes.len() != 64 {
        return Err(EnodeParseError::InvalidNodeId(format!(
            "expected 64 bytes, got {}",
            bytes.len()
        )));
    }

    let mut sec1 = Vec::with_capacity(65);
    sec1.push(0x04);
    sec1.extend_from_slice(&bytes);
    k256::PublicKey::from_sec1_bytes(&sec1).map_err(|_| EnodeParseError::InvalidPublicKey)?;

    let mut key = [0u8; 64];
    key.copy_from_slice(&bytes);
    Ok(key)
}

/// Extract `discport` from the query string; other parameters are ignored.
fn parse_discovery_port(query: &str) -> Result<Option<u16>, EnodeParseError> {
    for pair in query.split('&') {
        if let Some(value) = pair.strip_prefix("discport=") {
            let port = value
                .parse::<u16>()
                .map_err(|e| EnodeParseError::InvalidDiscoveryPort(format!("{value}: {e}")))?;
            return Ok(Some(port));
        }
    }
    Ok(None)
}

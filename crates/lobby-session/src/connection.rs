//! Connection records: the in-memory stand-in for a transport endpoint.
//!
//! Nothing here opens a socket. A "connection" is a record saying that a
//! user is online, with a deterministic pseudo-endpoint derived from the
//! user's id so that output is reproducible.

use std::fmt;
use std::time::SystemTime;

use lobby_protocol::{ConnectionId, UserId};
use serde::Serialize;

// ---------------------------------------------------------------------------
// ConnectionConfig
// ---------------------------------------------------------------------------

/// How pseudo-endpoints are derived.
///
/// A user with id `n` is given host `"{host_prefix}.{n}"` and port
/// `base_port + n`.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// First three octets of the simulated address. Default: `192.168.1`.
    pub host_prefix: String,

    /// Port offset. Default: 8080.
    pub base_port: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host_prefix: "192.168.1".to_string(),
            base_port: 8080,
        }
    }
}

impl ConnectionConfig {
    /// Derives the endpoint for `user_id`.
    pub fn endpoint_for(&self, user_id: UserId) -> Endpoint {
        Endpoint {
            host: format!("{}.{}", self.host_prefix, user_id.0),
            port: self.base_port.saturating_add(user_id.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Endpoint / ConnectionInfo
// ---------------------------------------------------------------------------

/// A simulated `(host, port)` pair.
///
/// The port is a `u64` because it's derived arithmetically from the user
/// id; it isn't meant to be bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u64,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// A tracked connection for one user.
///
/// A record exists only while the user is connected; disconnecting
/// removes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionInfo {
    pub connection_id: ConnectionId,
    pub user_id: UserId,
    pub endpoint: Endpoint,
    pub connected_at: SystemTime,
}

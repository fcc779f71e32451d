//! The connection tracker: which users are currently online.
//!
//! # Concurrency note
//!
//! `ConnectionTracker` is NOT thread-safe by itself. It's a plain
//! `HashMap` owned by whoever holds it; the `lobby` facade wraps it in a
//! mutex. Keeping it lock-free here means other registries can take it
//! as `&mut ConnectionTracker` inside a larger locked operation.

use std::collections::HashMap;
use std::time::SystemTime;

use lobby_protocol::{ConnectionId, UserId};

use crate::{ConnectionConfig, ConnectionInfo};

/// Tracks one simulated connection per user.
///
/// ## Lifecycle
///
/// ```text
/// connect() ──→ [tracked] ──→ disconnect() ──→ [gone]
///     ↑             │
///     └─────────────┘  connect() again overwrites with a new id
/// ```
///
/// There is no heartbeat. A connection stays tracked until somebody calls
/// [`disconnect`](Self::disconnect); a lost peer must be mapped to an
/// explicit disconnect by whoever notices it.
pub struct ConnectionTracker {
    /// Tracked connections, keyed by user id (not connection id): a user
    /// has at most one connection.
    connections: HashMap<UserId, ConnectionInfo>,

    /// Last connection id handed out.
    counter: u64,

    config: ConnectionConfig,
}

impl ConnectionTracker {
    /// Creates a tracker with no connections.
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            connections: HashMap::new(),
            counter: 0,
            config,
        }
    }

    /// Records a connection for `user_id` and returns a copy of it.
    ///
    /// Always succeeds. The user id isn't checked against the user
    /// registry. If the user is already tracked, the old record is
    /// silently replaced by one with a fresh connection id.
    pub fn connect(&mut self, user_id: UserId) -> ConnectionInfo {
        self.counter += 1;

        let info = ConnectionInfo {
            connection_id: ConnectionId(self.counter),
            user_id,
            endpoint: self.config.endpoint_for(user_id),
            connected_at: SystemTime::now(),
        };

        if let Some(old) = self.connections.insert(user_id, info.clone()) {
            tracing::debug!(
                %user_id,
                old = %old.connection_id,
                "replacing existing connection"
            );
        }

        tracing::info!(
            %user_id,
            connection_id = %info.connection_id,
            endpoint = %info.endpoint,
            "user connected"
        );
        info
    }

    /// Drops the tracked connection. Returns whether one existed.
    pub fn disconnect(&mut self, user_id: UserId) -> bool {
        let existed = self.connections.remove(&user_id).is_some();
        if existed {
            tracing::info!(%user_id, "user disconnected");
        }
        existed
    }

    /// Returns `true` if `user_id` has a tracked connection.
    pub fn is_connected(&self, user_id: UserId) -> bool {
        self.connections.contains_key(&user_id)
    }

    /// Looks up the tracked connection for `user_id`.
    pub fn get_connection(&self, user_id: UserId) -> Option<&ConnectionInfo> {
        self.connections.get(&user_id)
    }

    /// Returns the number of tracked connections.
    pub fn connected_count(&self) -> usize {
        self.connections.len()
    }

    /// Returns the ids of every connected user, ascending.
    pub fn connected_users(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self.connections.keys().copied().collect();
        users.sort();
        users
    }

    /// Drops every tracked connection and returns how many there were.
    pub fn disconnect_all(&mut self) -> usize {
        let count = self.connections.len();
        self.connections.clear();
        if count > 0 {
            tracing::info!(count, "all users disconnected");
        }
        count
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new(ConnectionConfig::default())
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(id: u64) -> UserId {
        UserId(id)
    }

    #[test]
    fn test_connect_returns_deterministic_endpoint() {
        let mut tracker = ConnectionTracker::default();

        let info = tracker.connect(uid(3));

        assert_eq!(info.connection_id, ConnectionId(1));
        assert_eq!(info.user_id, uid(3));
        assert_eq!(info.endpoint.host, "192.168.1.3");
        assert_eq!(info.endpoint.port, 8083);
        assert!(tracker.is_connected(uid(3)));
    }

    #[test]
    fn test_connect_unknown_user_still_succeeds() {
        // The tracker doesn't consult the user registry.
        let mut tracker = ConnectionTracker::default();
        tracker.connect(uid(999));
        assert!(tracker.is_connected(uid(999)));
    }

    #[test]
    fn test_connect_twice_overwrites_with_new_connection_id() {
        let mut tracker = ConnectionTracker::default();
        let first = tracker.connect(uid(1));

        let second = tracker.connect(uid(1));

        assert_ne!(first.connection_id, second.connection_id);
        assert_eq!(tracker.connected_count(), 1);
        assert_eq!(
            tracker.get_connection(uid(1)).unwrap().connection_id,
            second.connection_id
        );
    }

    #[test]
    fn test_connection_ids_are_unique_across_users() {
        let mut tracker = ConnectionTracker::default();
        let a = tracker.connect(uid(1));
        let b = tracker.connect(uid(2));
        assert_ne!(a.connection_id, b.connection_id);
    }

    #[test]
    fn test_disconnect_tracked_user_returns_true() {
        let mut tracker = ConnectionTracker::default();
        tracker.connect(uid(1));

        assert!(tracker.disconnect(uid(1)));
        assert!(!tracker.is_connected(uid(1)));
        assert!(tracker.get_connection(uid(1)).is_none());
    }

    #[test]
    fn test_disconnect_untracked_user_returns_false() {
        let mut tracker = ConnectionTracker::default();
        assert!(!tracker.disconnect(uid(1)));
    }

    #[test]
    fn test_connected_users_sorted() {
        let mut tracker = ConnectionTracker::default();
        tracker.connect(uid(3));
        tracker.connect(uid(1));
        tracker.connect(uid(2));

        assert_eq!(tracker.connected_users(), vec![uid(1), uid(2), uid(3)]);
    }

    #[test]
    fn test_disconnect_all_clears_everything() {
        let mut tracker = ConnectionTracker::default();
        tracker.connect(uid(1));
        tracker.connect(uid(2));

        assert_eq!(tracker.disconnect_all(), 2);
        assert_eq!(tracker.connected_count(), 0);
        assert_eq!(tracker.disconnect_all(), 0);
    }
}

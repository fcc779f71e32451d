//! Network records and settings.

use std::time::SystemTime;

use lobby_protocol::{NetworkId, UserId};
use serde::Serialize;

/// Configuration for a network broker.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Participant limit for every network, owner included. Default: 10.
    pub max_participants: usize,

    /// Name given to networks created with a blank name.
    pub default_name: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            max_participants: 10,
            default_name: "New network".to_string(),
        }
    }
}

/// Lifecycle of a network. `Closed` only ever appears on the record
/// returned by `close_network`; closed networks are removed from the
/// broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkStatus {
    Active,
    Closed,
}

/// A network group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Network {
    pub id: NetworkId,
    pub name: String,
    pub owner_id: UserId,
    /// Ordered by join time, owner first.
    pub participants: Vec<UserId>,
    #[serde(skip)]
    pub(crate) password: Option<String>,
    pub max_participants: usize,
    pub status: NetworkStatus,
    pub created_at: SystemTime,
}

impl Network {
    /// Returns `true` if `user_id` is a participant.
    pub fn contains(&self, user_id: UserId) -> bool {
        self.participants.contains(&user_id)
    }

    /// Returns `true` if joining requires a password.
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.participants.len() >= self.max_participants
    }
}

/// What happened when a notification was sent to a whole network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BroadcastReport {
    pub network_id: NetworkId,
    /// Participants at the time of the broadcast.
    pub participants: usize,
    /// Participants with a tracked connection.
    pub connected: usize,
    /// Notifications actually written to an inbox.
    pub delivered: usize,
}

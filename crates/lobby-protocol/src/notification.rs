//! Notification records delivered to users' inboxes.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::{NetworkId, UserId};

/// Why a notification was sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationKind {
    /// A user joined the network.
    Joined { user_id: UserId },
    /// A user left the network.
    Left { user_id: UserId },
    /// A message addressed to every participant of a network.
    Broadcast,
    /// A message addressed to a single user.
    Direct,
    /// A participant posted a message to the network host.
    Message { from: UserId },
}

/// A single notification, as written into a user's inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// The network the notification originated from. `None` for direct
    /// notifications that aren't tied to a network.
    pub network_id: Option<NetworkId>,
    pub kind: NotificationKind,
    /// Human-readable text.
    pub message: String,
    pub sent_at: SystemTime,
}

impl Notification {
    /// Creates a notification stamped with the current time.
    pub fn new(
        network_id: Option<NetworkId>,
        kind: NotificationKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            network_id,
            kind,
            message: message.into(),
            sent_at: SystemTime::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_kind_is_internally_tagged() {
        let kind = NotificationKind::Joined { user_id: UserId(2) };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], "joined");
        assert_eq!(json["user_id"], 2);
    }

    #[test]
    fn test_new_keeps_message_and_network() {
        let n = Notification::new(
            Some(NetworkId(4)),
            NotificationKind::Broadcast,
            "hello",
        );
        assert_eq!(n.network_id, Some(NetworkId(4)));
        assert_eq!(n.message, "hello");
        assert_eq!(n.kind, NotificationKind::Broadcast);
    }
}

//! Network broker: creates networks, manages membership, delivers
//! notifications.
//!
//! The broker owns network records and inboxes only. User names come from
//! a borrowed [`UserRegistry`] and connection state from a borrowed
//! [`ConnectionTracker`], so the caller decides how those registries are
//! locked.

use std::collections::HashMap;
use std::time::SystemTime;

use lobby_protocol::{NetworkId, Notification, NotificationKind, UserId};
use lobby_session::{ConnectionTracker, UserRegistry};

use crate::inbox::{self, NotificationReceiver, NotificationSender};
use crate::{BroadcastReport, Network, NetworkConfig, NetworkError, NetworkStatus};

/// Owns every active network and every user's notification inbox.
///
/// ## Delivery
///
/// A notification reaches a user only if the user is connected in the
/// [`ConnectionTracker`] AND has subscribed an inbox. Anything else is a
/// silent drop, never an error: a participant who went offline simply
/// misses the message.
pub struct NetworkBroker {
    /// Active networks, keyed by id. Closing removes the entry.
    networks: HashMap<NetworkId, Network>,

    /// Per-user outbound channels.
    inboxes: HashMap<UserId, NotificationSender>,

    next_id: u64,

    config: NetworkConfig,
}

impl NetworkBroker {
    /// Creates a broker with no networks.
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            networks: HashMap::new(),
            inboxes: HashMap::new(),
            next_id: 1,
            config,
        }
    }

    /// Creates a network with `owner_id` as its first participant.
    ///
    /// A blank `name` gets the configured default name. An empty password
    /// means "no password".
    ///
    /// # Errors
    /// [`NetworkError::OwnerNotFound`] if the owner isn't registered.
    pub fn create_network(
        &mut self,
        users: &UserRegistry,
        owner_id: UserId,
        name: &str,
        password: Option<&str>,
    ) -> Result<Network, NetworkError> {
        if !users.contains(owner_id) {
            tracing::debug!(%owner_id, "network owner not found");
            return Err(NetworkError::OwnerNotFound(owner_id));
        }

        let id = NetworkId(self.next_id);
        self.next_id += 1;

        let name = if name.trim().is_empty() {
            self.config.default_name.clone()
        } else {
            name.to_string()
        };

        let network = Network {
            id,
            name,
            owner_id,
            participants: vec![owner_id],
            password: password.filter(|p| !p.is_empty()).map(str::to_string),
            max_participants: self.config.max_participants,
            status: NetworkStatus::Active,
            created_at: SystemTime::now(),
        };

        self.networks.insert(id, network.clone());
        tracing::info!(network_id = %id, %owner_id, name = %network.name, "network created");
        Ok(network)
    }

    /// Closes a network. Owner only.
    ///
    /// Every participant is disconnected from the tracker and the record
    /// is deleted; the id stops resolving. Returns the final record with
    /// status `Closed`.
    pub fn close_network(
        &mut self,
        tracker: &mut ConnectionTracker,
        network_id: NetworkId,
        requester_id: UserId,
    ) -> Result<Network, NetworkError> {
        let network = self
            .networks
            .get(&network_id)
            .ok_or(NetworkError::NotFound(network_id))?;

        if network.owner_id != requester_id {
            return Err(NetworkError::NotOwner(requester_id, network_id));
        }

        let mut network = self
            .networks
            .remove(&network_id)
            .ok_or(NetworkError::NotFound(network_id))?;

        for &participant in &network.participants {
            tracker.disconnect(participant);
        }
        network.status = NetworkStatus::Closed;

        tracing::info!(
            %network_id,
            participants = network.participants.len(),
            "network closed"
        );
        Ok(network)
    }

    /// Adds `user_id` to a network and announces it to the participants.
    ///
    /// The password is only checked when the network has one.
    pub fn join_network(
        &mut self,
        users: &UserRegistry,
        tracker: &ConnectionTracker,
        network_id: NetworkId,
        user_id: UserId,
        password: Option<&str>,
    ) -> Result<(), NetworkError> {
        let network = self
            .networks
            .get_mut(&network_id)
            .ok_or(NetworkError::NotFound(network_id))?;

        if let Some(expected) = network.password.as_deref() {
            if password != Some(expected) {
                return Err(NetworkError::WrongPassword(network_id));
            }
        }
        if network.contains(user_id) {
            return Err(NetworkError::AlreadyParticipant(user_id, network_id));
        }
        if network.is_full() {
            return Err(NetworkError::NetworkFull(network_id));
        }

        network.participants.push(user_id);

        let name = users.display_name(user_id);
        tracing::info!(
            %network_id,
            %user_id,
            participants = network.participants.len(),
            "user joined network"
        );

        self.notify_network(
            tracker,
            network_id,
            NotificationKind::Joined { user_id },
            &format!("{name} joined"),
        );
        Ok(())
    }

    /// Removes `user_id` from a network, disconnects them, and announces
    /// it to the remaining participants.
    pub fn leave_network(
        &mut self,
        users: &UserRegistry,
        tracker: &mut ConnectionTracker,
        network_id: NetworkId,
        user_id: UserId,
    ) -> Result<(), NetworkError> {
        let network = self
            .networks
            .get_mut(&network_id)
            .ok_or(NetworkError::NotFound(network_id))?;

        if user_id == network.owner_id {
            return Err(NetworkError::OwnerCannotLeave(network_id));
        }

        let pos = network
            .participants
            .iter()
            .position(|&p| p == user_id)
            .ok_or(NetworkError::NotParticipant(user_id, network_id))?;
        network.participants.remove(pos);

        tracker.disconnect(user_id);

        let name = users.display_name(user_id);
        tracing::info!(%network_id, %user_id, "user left network");

        self.notify_network(
            tracker,
            network_id,
            NotificationKind::Left { user_id },
            &format!("{name} left the network"),
        );
        Ok(())
    }

    /// Sends `message` to every participant of a network.
    pub fn broadcast(
        &self,
        tracker: &ConnectionTracker,
        network_id: NetworkId,
        message: &str,
    ) -> Result<BroadcastReport, NetworkError> {
        if !self.networks.contains_key(&network_id) {
            return Err(NetworkError::NotFound(network_id));
        }
        Ok(self.notify_network(
            tracker,
            network_id,
            NotificationKind::Broadcast,
            message,
        ))
    }

    /// Sends `message` to one user. Returns whether it was delivered.
    pub fn unicast_notify(
        &self,
        tracker: &ConnectionTracker,
        user_id: UserId,
        message: &str,
    ) -> bool {
        let notification =
            Notification::new(None, NotificationKind::Direct, message);
        let delivered = self.send_to(tracker, user_id, notification);
        tracing::debug!(%user_id, delivered, "direct notification");
        delivered
    }

    /// A participant posts a message to the network host (its owner).
    ///
    /// # Errors
    /// [`NetworkError::NotFound`] or [`NetworkError::NotParticipant`].
    pub fn post_message(
        &self,
        users: &UserRegistry,
        tracker: &ConnectionTracker,
        network_id: NetworkId,
        user_id: UserId,
        message: &str,
    ) -> Result<(), NetworkError> {
        let network = self
            .networks
            .get(&network_id)
            .ok_or(NetworkError::NotFound(network_id))?;

        if !network.contains(user_id) {
            tracing::warn!(%network_id, %user_id, "message from non-participant");
            return Err(NetworkError::NotParticipant(user_id, network_id));
        }

        let name = users.display_name(user_id);
        tracing::info!(%network_id, %user_id, %message, "network received message");

        let notification = Notification::new(
            Some(network_id),
            NotificationKind::Message { from: user_id },
            format!("{name}: {message}"),
        );
        self.send_to(tracker, network.owner_id, notification);
        Ok(())
    }

    /// Registers a fresh inbox for `user_id`, replacing any previous one.
    ///
    /// The previous receiver (if any) stops getting new notifications.
    pub fn subscribe(&mut self, user_id: UserId) -> NotificationReceiver {
        let (tx, rx) = inbox::channel();
        self.inboxes.insert(user_id, tx);
        tracing::debug!(%user_id, "inbox subscribed");
        rx
    }

    /// Drops the inbox for `user_id`.
    pub fn unsubscribe(&mut self, user_id: UserId) {
        self.inboxes.remove(&user_id);
    }

    /// Looks up an active network.
    pub fn get_network(&self, network_id: NetworkId) -> Option<&Network> {
        self.networks.get(&network_id)
    }

    /// Lists active networks, ordered by id.
    pub fn list_active_networks(&self) -> Vec<Network> {
        let mut networks: Vec<Network> =
            self.networks.values().cloned().collect();
        networks.sort_by_key(|n| n.id);
        networks
    }

    /// Returns the number of active networks.
    pub fn network_count(&self) -> usize {
        self.networks.len()
    }

    /// Closes every network on behalf of its owner. Returns the closed
    /// ids. Used by the shutdown sweep.
    pub fn close_all(&mut self, tracker: &mut ConnectionTracker) -> Vec<NetworkId> {
        let targets: Vec<(NetworkId, UserId)> = self
            .list_active_networks()
            .into_iter()
            .map(|n| (n.id, n.owner_id))
            .collect();

        targets
            .into_iter()
            .filter_map(|(network_id, owner_id)| {
                self.close_network(tracker, network_id, owner_id)
                    .ok()
                    .map(|n| n.id)
            })
            .collect()
    }

    /// Delivers one notification to every participant of a network.
    fn notify_network(
        &self,
        tracker: &ConnectionTracker,
        network_id: NetworkId,
        kind: NotificationKind,
        message: &str,
    ) -> BroadcastReport {
        let Some(network) = self.networks.get(&network_id) else {
            return BroadcastReport {
                network_id,
                participants: 0,
                connected: 0,
                delivered: 0,
            };
        };

        let connected = network
            .participants
            .iter()
            .filter(|&&p| tracker.is_connected(p))
            .count();

        let notification = Notification::new(Some(network_id), kind, message);
        let delivered = network
            .participants
            .iter()
            .filter(|&&p| self.send_to(tracker, p, notification.clone()))
            .count();

        tracing::debug!(
            %network_id,
            participants = network.participants.len(),
            connected,
            delivered,
            "network notified"
        );

        BroadcastReport {
            network_id,
            participants: network.participants.len(),
            connected,
            delivered,
        }
    }

    /// Writes a notification into a user's inbox. Silently drops it if
    /// the user is offline, has no inbox, or dropped the receiver.
    fn send_to(
        &self,
        tracker: &ConnectionTracker,
        user_id: UserId,
        notification: Notification,
    ) -> bool {
        if !tracker.is_connected(user_id) {
            return false;
        }
        match self.inboxes.get(&user_id) {
            Some(sender) => sender.send(notification).is_ok(),
            None => false,
        }
    }
}

impl Default for NetworkBroker {
    fn default() -> Self {
        Self::new(NetworkConfig::default())
    }
}

// =========================================================================
// Tests
// =========================================================================

//! Per-user client handle.
//!
//! A `Client` remembers who is logged in and owns that user's
//! notification inbox. It holds no authority of its own: every action goes
//! through the shared [`Lobby`], so "connected" always means connected in
//! the lobby's tracker. Closing a network the user is in disconnects the
//! client too.

use lobby_network::NotificationReceiver;
use lobby_protocol::{NetworkId, Notification, UserId};
use lobby_session::{ConnectionInfo, SessionError, User};
use serde::Serialize;

use crate::{Lobby, LobbyError};

/// What a client reports about itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientStatus {
    pub user: Option<User>,
    pub connected: bool,
    pub network_id: Option<NetworkId>,
    pub connection: Option<ConnectionInfo>,
}

/// A session handle for one user.
pub struct Client {
    lobby: Lobby,
    user: Option<User>,
    network_id: Option<NetworkId>,
    inbox: Option<NotificationReceiver>,
}

impl Client {
    /// Creates a client with nobody logged in.
    pub fn new(lobby: Lobby) -> Self {
        Self {
            lobby,
            user: None,
            network_id: None,
            inbox: None,
        }
    }

    /// The logged-in user's id, if any.
    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|u| u.id)
    }

    /// Registers a new user and logs in as them.
    pub async fn register(
        &mut self,
        name: &str,
        password: &str,
    ) -> Result<User, LobbyError> {
        let user = self.lobby.create_user(name, Some(password)).await?;
        self.user = Some(user.clone());
        Ok(user)
    }

    /// Logs in as an existing user.
    ///
    /// # Errors
    /// [`SessionError::AuthFailed`] if no user matches.
    pub async fn login(
        &mut self,
        name: &str,
        password: &str,
    ) -> Result<User, LobbyError> {
        let user = self
            .lobby
            .authenticate(name, password)
            .await
            .ok_or(SessionError::AuthFailed)?;
        self.user = Some(user.clone());
        Ok(user)
    }

    /// Connects the logged-in user and opens their inbox.
    ///
    /// `network_id` only records which network this client considers
    /// current; joining it is a separate step.
    pub async fn connect(
        &mut self,
        network_id: Option<NetworkId>,
    ) -> Result<ConnectionInfo, LobbyError> {
        let user_id = self.user_id().ok_or(LobbyError::NotLoggedIn)?;
        if self.lobby.is_connected(user_id).await {
            return Err(LobbyError::AlreadyConnected);
        }

        let info = self.lobby.connect(user_id).await;
        self.inbox = Some(self.lobby.subscribe(user_id).await);
        self.network_id = network_id;

        tracing::info!(
            %user_id,
            endpoint = %info.endpoint,
            network_id = ?network_id,
            "client connected"
        );
        Ok(info)
    }

    /// Disconnects the logged-in user.
    pub async fn disconnect(&mut self) -> Result<(), LobbyError> {
        let user_id = self.user_id().ok_or(LobbyError::NotLoggedIn)?;
        if !self.lobby.disconnect(user_id).await {
            return Err(LobbyError::NotConnected);
        }
        self.network_id = None;
        tracing::info!(%user_id, "client disconnected");
        Ok(())
    }

    /// Sends a message to the server.
    ///
    /// With a current network the message is posted to that network's
    /// owner; otherwise it is only logged.
    pub async fn send_message(&self, message: &str) -> Result<(), LobbyError> {
        let user_id = self.user_id().ok_or(LobbyError::NotLoggedIn)?;
        if !self.lobby.is_connected(user_id).await {
            return Err(LobbyError::NotConnected);
        }

        match self.network_id {
            Some(network_id) => {
                self.lobby.post_message(network_id, user_id, message).await?
            }
            None => tracing::info!(%user_id, %message, "message to server"),
        }
        Ok(())
    }

    /// Takes the next pending notification, if one is waiting.
    pub fn try_recv_notification(&mut self) -> Option<Notification> {
        self.inbox.as_mut()?.try_recv().ok()
    }

    /// Reports who is logged in and how they're connected.
    pub async fn status(&self) -> ClientStatus {
        let (connected, connection) = match self.user_id() {
            Some(user_id) => {
                let connection = self.lobby.get_connection(user_id).await;
                (connection.is_some(), connection)
            }
            None => (false, None),
        };

        ClientStatus {
            user: self.user.clone(),
            connected,
            network_id: if connected { self.network_id } else { None },
            connection,
        }
    }
}

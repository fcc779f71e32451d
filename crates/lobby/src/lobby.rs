//! The `Lobby` facade and its builder.
//!
//! `Lobby` owns one instance of every registry, each behind its own lock:
//!
//! ```text
//! users        RwLock<UserRegistry>       (many readers)
//! connections  Mutex<ConnectionTracker>
//! networks     Mutex<NetworkBroker>
//! rooms        Mutex<RoomRegistry>
//! games        Mutex<GameCoordinator>
//! ```
//!
//! Locks are always acquired top to bottom in that order, and an
//! operation that touches several registries holds all of its locks until
//! it's done. Two tasks can therefore never wait on each other in a
//! cycle, and nobody observes a game whose room hasn't caught up yet.

use std::sync::Arc;

use lobby_network::{
    BroadcastReport, Network, NetworkBroker, NetworkConfig,
    NotificationReceiver,
};
use lobby_protocol::{GameId, NetworkId, RoomId, UserId};
use lobby_room::{
    Game, GameCoordinator, GameEnded, NewRoom, Room, RoomConfig, RoomRegistry,
};
use lobby_session::{
    ConnectionConfig, ConnectionInfo, ConnectionTracker, SessionConfig, User,
    UserRegistry,
};
use tokio::sync::{Mutex, RwLock};

use crate::{Client, LobbyError, ShutdownReport, SystemStatus};

/// Settings for every registry of a lobby.
#[derive(Debug, Clone, Default)]
pub struct LobbyConfig {
    pub session: SessionConfig,
    pub connection: ConnectionConfig,
    pub network: NetworkConfig,
    pub room: RoomConfig,
}

/// Shared lobby state. Cloning a [`Lobby`] clones the `Arc`, not this.
struct LobbyState {
    users: RwLock<UserRegistry>,
    connections: Mutex<ConnectionTracker>,
    networks: Mutex<NetworkBroker>,
    rooms: Mutex<RoomRegistry>,
    games: Mutex<GameCoordinator>,
}

/// Builder for configuring a [`Lobby`].
///
/// # Example
///
/// ```rust
/// use lobby::prelude::*;
///
/// let lobby = Lobby::builder()
///     .room_config(RoomConfig {
///         min_players: 3,
///         ..RoomConfig::default()
///     })
///     .build();
/// # let _ = lobby;
/// ```
pub struct LobbyBuilder {
    config: LobbyConfig,
}

impl LobbyBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: LobbyConfig::default(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: LobbyConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the user registry configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.config.session = config;
        self
    }

    /// Sets how simulated endpoints are derived.
    pub fn connection_config(mut self, config: ConnectionConfig) -> Self {
        self.config.connection = config;
        self
    }

    /// Sets the network broker configuration.
    pub fn network_config(mut self, config: NetworkConfig) -> Self {
        self.config.network = config;
        self
    }

    /// Sets the room registry configuration.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.config.room = config;
        self
    }

    /// Builds an empty lobby.
    pub fn build(self) -> Lobby {
        let LobbyConfig {
            session,
            connection,
            network,
            room,
        } = self.config;

        let state = Arc::new(LobbyState {
            users: RwLock::new(UserRegistry::new(session)),
            connections: Mutex::new(ConnectionTracker::new(connection)),
            networks: Mutex::new(NetworkBroker::new(network)),
            rooms: Mutex::new(RoomRegistry::new(room)),
            games: Mutex::new(GameCoordinator::new()),
        });

        tracing::debug!("lobby built");
        Lobby { state }
    }
}

impl Default for LobbyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A handle to a running lobby.
///
/// Cheap to clone; all clones share the same registries. Every method
/// takes `&self`, so a handle can be moved into as many tasks as needed.
#[derive(Clone)]
pub struct Lobby {
    state: Arc<LobbyState>,
}

impl Lobby {
    /// Creates a new builder.
    pub fn builder() -> LobbyBuilder {
        LobbyBuilder::new()
    }

    /// Creates a client handle bound to this lobby.
    pub fn create_client(&self) -> Client {
        Client::new(self.clone())
    }

    // =====================================================================
    // Identity
    // =====================================================================

    pub async fn create_user(
        &self,
        name: &str,
        password: Option<&str>,
    ) -> Result<User, LobbyError> {
        let mut users = self.state.users.write().await;
        Ok(users.create_user(name, password)?)
    }

    /// Returns the first user whose name and password match.
    pub async fn authenticate(&self, name: &str, password: &str) -> Option<User> {
        let users = self.state.users.read().await;
        users.authenticate(name, password).cloned()
    }

    pub async fn get_user(&self, user_id: UserId) -> Option<User> {
        let users = self.state.users.read().await;
        users.get_user(user_id).cloned()
    }

    pub async fn list_users(&self) -> Vec<User> {
        self.state.users.read().await.list_users()
    }

    // =====================================================================
    // Connections
    // =====================================================================

    /// Marks `user_id` as connected, replacing any previous connection.
    pub async fn connect(&self, user_id: UserId) -> ConnectionInfo {
        self.state.connections.lock().await.connect(user_id)
    }

    pub async fn disconnect(&self, user_id: UserId) -> bool {
        self.state.connections.lock().await.disconnect(user_id)
    }

    pub async fn is_connected(&self, user_id: UserId) -> bool {
        self.state.connections.lock().await.is_connected(user_id)
    }

    pub async fn get_connection(&self, user_id: UserId) -> Option<ConnectionInfo> {
        let connections = self.state.connections.lock().await;
        connections.get_connection(user_id).cloned()
    }

    // =====================================================================
    // Networks
    // =====================================================================

    pub async fn create_network(
        &self,
        owner_id: UserId,
        name: &str,
        password: Option<&str>,
    ) -> Result<Network, LobbyError> {
        let users = self.state.users.read().await;
        let mut networks = self.state.networks.lock().await;
        Ok(networks.create_network(&users, owner_id, name, password)?)
    }

    /// Closes a network, disconnecting all of its participants.
    pub async fn close_network(
        &self,
        network_id: NetworkId,
        requester_id: UserId,
    ) -> Result<Network, LobbyError> {
        let mut connections = self.state.connections.lock().await;
        let mut networks = self.state.networks.lock().await;
        Ok(networks.close_network(&mut connections, network_id, requester_id)?)
    }

    pub async fn join_network(
        &self,
        network_id: NetworkId,
        user_id: UserId,
        password: Option<&str>,
    ) -> Result<(), LobbyError> {
        let users = self.state.users.read().await;
        let connections = self.state.connections.lock().await;
        let mut networks = self.state.networks.lock().await;
        networks.join_network(&users, &connections, network_id, user_id, password)?;
        Ok(())
    }

    pub async fn leave_network(
        &self,
        network_id: NetworkId,
        user_id: UserId,
    ) -> Result<(), LobbyError> {
        let users = self.state.users.read().await;
        let mut connections = self.state.connections.lock().await;
        let mut networks = self.state.networks.lock().await;
        networks.leave_network(&users, &mut connections, network_id, user_id)?;
        Ok(())
    }

    pub async fn broadcast(
        &self,
        network_id: NetworkId,
        message: &str,
    ) -> Result<BroadcastReport, LobbyError> {
        let connections = self.state.connections.lock().await;
        let networks = self.state.networks.lock().await;
        Ok(networks.broadcast(&connections, network_id, message)?)
    }

    /// Sends `message` to one user. Returns whether it was delivered.
    pub async fn unicast_notify(&self, user_id: UserId, message: &str) -> bool {
        let connections = self.state.connections.lock().await;
        let networks = self.state.networks.lock().await;
        networks.unicast_notify(&connections, user_id, message)
    }

    pub async fn list_active_networks(&self) -> Vec<Network> {
        self.state.networks.lock().await.list_active_networks()
    }

    pub async fn get_network_info(&self, network_id: NetworkId) -> Option<Network> {
        let networks = self.state.networks.lock().await;
        networks.get_network(network_id).cloned()
    }

    /// A participant sends a message to the network's owner.
    pub async fn post_message(
        &self,
        network_id: NetworkId,
        user_id: UserId,
        message: &str,
    ) -> Result<(), LobbyError> {
        let users = self.state.users.read().await;
        let connections = self.state.connections.lock().await;
        let networks = self.state.networks.lock().await;
        networks.post_message(&users, &connections, network_id, user_id, message)?;
        Ok(())
    }

    /// Opens a fresh notification inbox for `user_id`.
    pub async fn subscribe(&self, user_id: UserId) -> NotificationReceiver {
        self.state.networks.lock().await.subscribe(user_id)
    }

    // =====================================================================
    // Rooms
    // =====================================================================

    /// Creates a room. The owner must be a registered user.
    pub async fn create_room(&self, new_room: NewRoom) -> Result<Room, LobbyError> {
        let users = self.state.users.read().await;
        if !users.contains(new_room.owner_id) {
            return Err(LobbyError::UnknownUser(new_room.owner_id));
        }
        let mut rooms = self.state.rooms.lock().await;
        Ok(rooms.create_room(new_room)?)
    }

    /// Adds a registered user to a waiting room.
    pub async fn join_room(
        &self,
        room_id: RoomId,
        user_id: UserId,
        password: Option<&str>,
    ) -> Result<(), LobbyError> {
        let users = self.state.users.read().await;
        if !users.contains(user_id) {
            return Err(LobbyError::UnknownUser(user_id));
        }
        let mut rooms = self.state.rooms.lock().await;
        rooms.join_room(room_id, user_id, password)?;
        Ok(())
    }

    pub async fn leave_room(
        &self,
        room_id: RoomId,
        user_id: UserId,
    ) -> Result<(), LobbyError> {
        self.state.rooms.lock().await.leave_room(room_id, user_id)?;
        Ok(())
    }

    pub async fn close_room(
        &self,
        room_id: RoomId,
        requester_id: UserId,
    ) -> Result<(), LobbyError> {
        self.state.rooms.lock().await.close_room(room_id, requester_id)?;
        Ok(())
    }

    pub async fn delete_room(
        &self,
        room_id: RoomId,
        requester_id: UserId,
    ) -> Result<Room, LobbyError> {
        let mut rooms = self.state.rooms.lock().await;
        Ok(rooms.delete_room(room_id, requester_id)?)
    }

    /// Rooms in `waiting` or `started`, ordered by id.
    pub async fn get_active_rooms(&self) -> Vec<Room> {
        self.state.rooms.lock().await.get_active_rooms()
    }

    pub async fn get_room_info(&self, room_id: RoomId) -> Result<Room, LobbyError> {
        Ok(self.state.rooms.lock().await.get_room_info(room_id)?)
    }

    pub async fn get_room_participants(
        &self,
        room_id: RoomId,
    ) -> Result<Vec<UserId>, LobbyError> {
        Ok(self.state.rooms.lock().await.get_room_participants(room_id)?)
    }

    // =====================================================================
    // Games
    // =====================================================================

    /// Starts a game in a waiting room. Holds the room and game locks
    /// together.
    pub async fn start_game(
        &self,
        room_id: RoomId,
        requester_id: UserId,
    ) -> Result<Game, LobbyError> {
        let mut rooms = self.state.rooms.lock().await;
        let mut games = self.state.games.lock().await;
        Ok(games.start_game(&mut rooms, room_id, requester_id)?)
    }

    /// Ends a game and closes its room.
    pub async fn close_game(
        &self,
        game_id: GameId,
        requester_id: UserId,
    ) -> Result<GameEnded, LobbyError> {
        let mut rooms = self.state.rooms.lock().await;
        let mut games = self.state.games.lock().await;
        Ok(games.close_game(&mut rooms, game_id, requester_id)?)
    }

    /// The active game of a room, if any.
    pub async fn get_game_by_room(&self, room_id: RoomId) -> Option<Game> {
        let games = self.state.games.lock().await;
        games.get_game_by_room(room_id).cloned()
    }

    pub async fn get_game(&self, game_id: GameId) -> Option<Game> {
        let games = self.state.games.lock().await;
        games.get_game(game_id).cloned()
    }

    // =====================================================================
    // System
    // =====================================================================

    /// Takes a consistent snapshot of every registry.
    pub async fn status(&self) -> SystemStatus {
        let users = self.state.users.read().await;
        let connections = self.state.connections.lock().await;
        let networks = self.state.networks.lock().await;
        let rooms = self.state.rooms.lock().await;
        let games = self.state.games.lock().await;

        SystemStatus {
            users_count: users.len(),
            active_connections: connections.connected_count(),
            active_networks: networks.list_active_networks(),
            active_rooms: rooms.get_active_rooms(),
            active_games: games.active_games().len(),
        }
    }

    /// Drains the lobby.
    ///
    /// Ends every active game (closing its room), closes the remaining
    /// active rooms, closes every network, then disconnects whoever is
    /// still connected. Users stay registered.
    pub async fn shutdown(&self) -> ShutdownReport {
        let _users = self.state.users.read().await;
        let mut connections = self.state.connections.lock().await;
        let mut networks = self.state.networks.lock().await;
        let mut rooms = self.state.rooms.lock().await;
        let mut games = self.state.games.lock().await;

        let games_ended: Vec<GameId> = games
            .end_all(&mut rooms)
            .into_iter()
            .map(|ended| ended.game.id)
            .collect();
        let rooms_closed = rooms.close_all_active();
        let networks_closed = networks.close_all(&mut connections);
        let disconnected = connections.disconnect_all();

        let report = ShutdownReport {
            games_ended,
            rooms_closed,
            networks_closed,
            disconnected,
        };
        tracing::info!(
            games = report.games_ended.len(),
            rooms = report.rooms_closed.len(),
            networks = report.networks_closed.len(),
            disconnected = report.disconnected,
            "lobby shut down"
        );
        report
    }
}

impl Default for Lobby {
    fn default() -> Self {
        Self::builder().build()
    }
}

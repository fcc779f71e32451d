//! Snapshot records returned by `Lobby::status` and `Lobby::shutdown`.

use lobby_network::Network;
use lobby_protocol::{GameId, NetworkId, RoomId};
use lobby_room::Room;
use serde::Serialize;

/// A point-in-time summary of the whole lobby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemStatus {
    pub users_count: usize,
    pub active_connections: usize,
    /// Ordered by id.
    pub active_networks: Vec<Network>,
    /// Rooms in `waiting` or `started`, ordered by id.
    pub active_rooms: Vec<Room>,
    pub active_games: usize,
}

/// What a shutdown tore down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShutdownReport {
    pub games_ended: Vec<GameId>,
    /// Rooms closed directly, not counting rooms closed by ending a game.
    pub rooms_closed: Vec<RoomId>,
    pub networks_closed: Vec<NetworkId>,
    /// Connections still open after the networks were closed.
    pub disconnected: usize,
}

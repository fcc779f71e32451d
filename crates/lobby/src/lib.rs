//! # Lobby
//!
//! An in-memory multi-user lobby: users register and log in, gather in
//! password-gated networks, open rooms, and turn rooms into games.
//!
//! Each concern lives in its own crate with plain, single-owner
//! registries. This crate ties them together behind one cloneable
//! [`Lobby`] handle that puts every registry behind its own lock.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lobby::prelude::*;
//!
//! # async fn run() -> Result<(), LobbyError> {
//! let lobby = Lobby::builder().build();
//!
//! let ann = lobby.create_user("ann", Some("password123")).await?;
//! let bob = lobby.create_user("bob", Some("password456")).await?;
//!
//! let room = lobby.create_room(NewRoom::public(ann.id, 4)).await?;
//! lobby.join_room(room.id, bob.id, None).await?;
//!
//! let game = lobby.start_game(room.id, ann.id).await?;
//! let ended = lobby.close_game(game.id, ann.id).await?;
//! assert!(ended.room_closed());
//!
//! lobby.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod lobby;
mod status;

pub use client::{Client, ClientStatus};
pub use error::LobbyError;
pub use lobby::{Lobby, LobbyBuilder, LobbyConfig};
pub use status::{ShutdownReport, SystemStatus};

/// Everything needed to drive a lobby, in one import.
pub mod prelude {
    pub use crate::{
        Client, ClientStatus, Lobby, LobbyBuilder, LobbyConfig, LobbyError,
        ShutdownReport, SystemStatus,
    };
    pub use lobby_network::{
        BroadcastReport, Network, NetworkConfig, NetworkError, NetworkStatus,
        NotificationReceiver,
    };
    pub use lobby_protocol::{
        ConnectionId, FailureKind, GameId, NetworkId, Notification,
        NotificationKind, RoomId, UserId,
    };
    pub use lobby_room::{
        Game, GameEnded, GameError, GameStatus, NewRoom, Room, RoomAccess,
        RoomConfig, RoomError, RoomStatus,
    };
    pub use lobby_session::{
        ConnectionConfig, ConnectionInfo, Endpoint, SessionConfig,
        SessionError, User,
    };
}

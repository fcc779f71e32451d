//! Room lifecycle and game coordination for the lobby core.
//!
//! Rooms are game lobbies with an owner, an access mode, a capacity and a
//! three-state lifecycle. A game is the active-play period of a room.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: creates, joins, leaves, closes and deletes rooms
//! - [`GameCoordinator`]: starts and ends games, driving room status
//! - [`RoomStatus`]: `waiting → started → closed` state machine
//! - [`RoomConfig`]: registry settings (minimum capacity, default names)

mod config;
mod coordinator;
mod error;
mod game;
mod registry;
mod room;

pub use config::{RoomAccess, RoomConfig, RoomStatus};
pub use coordinator::GameCoordinator;
pub use error::{GameError, RoomError};
pub use game::{Game, GameEnded, GameStatus};
pub use registry::RoomRegistry;
pub use room::{NewRoom, Room};

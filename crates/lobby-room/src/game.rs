//! Game records.

use std::fmt;
use std::time::SystemTime;

use lobby_protocol::{GameId, RoomId, UserId};
use serde::Serialize;

use crate::RoomError;

/// The lifecycle state of a game: `Active → Ended`, terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Active,
    Ended,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

/// One game, bound to the `started` period of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    pub id: GameId,
    pub room_id: RoomId,
    pub owner_id: UserId,
    /// Copy of the room's participants at the moment the game started.
    pub participants: Vec<UserId>,
    pub status: GameStatus,
    pub created_at: SystemTime,
    pub ended_at: Option<SystemTime>,
}

/// Outcome of a successful `close_game`.
///
/// The game is always ended. Closing its room is attempted afterwards and
/// may fail independently (the room could have been closed or deleted
/// through another path); `room_closure` carries that result. This is the
/// one place where game and room state can diverge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEnded {
    pub game: Game,
    pub room_closure: Result<(), RoomError>,
}

impl GameEnded {
    /// Returns `true` if the associated room was closed as well.
    pub fn room_closed(&self) -> bool {
        self.room_closure.is_ok()
    }
}

impl fmt::Display for GameEnded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.room_closure {
            Ok(()) => write!(
                f,
                "game {} ended and room {} closed",
                self.game.id, self.game.room_id
            ),
            Err(e) => write!(
                f,
                "game {} ended, but room {} could not be closed: {}",
                self.game.id, self.game.room_id, e
            ),
        }
    }
}

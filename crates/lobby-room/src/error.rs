//! Error types for the room layer.

use lobby_protocol::{FailureKind, GameId, RoomId, UserId};

use crate::RoomStatus;

/// Errors that can occur during room operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// The access mode was neither `public` nor `private`.
    #[error("invalid access '{0}': expected 'public' or 'private'")]
    InvalidAccess(String),

    /// A private room was requested without a password.
    #[error("private rooms require a password")]
    MissingPassword,

    /// The requested capacity is below the minimum.
    #[error("max players must be at least {min}, got {requested}")]
    TooFewPlayers { requested: usize, min: usize },

    /// The owner already has a waiting or started room.
    #[error("user {0} already owns active room {1}")]
    OwnerHasActiveRoom(UserId, RoomId),

    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The room is not in `waiting`, so membership is frozen.
    #[error("room {0} is {1} and not accepting changes")]
    NotWaiting(RoomId, RoomStatus),

    /// A private room was joined without a password.
    #[error("room {0} requires a password")]
    PasswordRequired(RoomId),

    /// A private room was joined with the wrong password.
    #[error("wrong password for room {0}")]
    WrongPassword(RoomId),

    /// The user is already a participant.
    #[error("user {0} already in room {1}")]
    AlreadyInRoom(UserId, RoomId),

    /// No free player slots.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The user is not a participant.
    #[error("user {0} not in room {1}")]
    NotInRoom(UserId, RoomId),

    /// Owners can't leave their own room; they close it instead.
    #[error("the owner cannot leave room {0}, close it instead")]
    OwnerCannotLeave(RoomId),

    /// Only the owner may close or delete a room.
    #[error("user {0} does not own room {1}")]
    NotOwner(UserId, RoomId),

    /// The room was already closed.
    #[error("room {0} is already closed")]
    AlreadyClosed(RoomId),
}

impl RoomError {
    /// Returns the failure category of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidAccess(_)
            | Self::MissingPassword
            | Self::TooFewPlayers { .. } => FailureKind::Validation,
            Self::NotFound(_) => FailureKind::NotFound,
            Self::PasswordRequired(_)
            | Self::WrongPassword(_)
            | Self::NotOwner(..) => FailureKind::Unauthorized,
            Self::OwnerHasActiveRoom(..)
            | Self::NotWaiting(..)
            | Self::AlreadyInRoom(..)
            | Self::RoomFull(_)
            | Self::NotInRoom(..)
            | Self::OwnerCannotLeave(_)
            | Self::AlreadyClosed(_) => FailureKind::Conflict,
        }
    }
}

/// Errors that can occur when starting or ending a game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The room to start a game in does not exist.
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// Only the room owner may start a game.
    #[error("only the owner of room {1} can start a game (requested by {0})")]
    NotRoomOwner(UserId, RoomId),

    /// The room was closed.
    #[error("room {0} is closed")]
    RoomClosed(RoomId),

    /// The room already has a running game.
    #[error("a game is already started in room {0}")]
    AlreadyStarted(RoomId),

    /// The game does not exist.
    #[error("game {0} not found")]
    NotFound(GameId),

    /// Only the game owner may end it.
    #[error("only the owner can end game {1} (requested by {0})")]
    NotGameOwner(UserId, GameId),

    /// The game already ended.
    #[error("game {0} has already ended")]
    AlreadyEnded(GameId),
}

impl GameError {
    /// Returns the failure category of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::RoomNotFound(_) | Self::NotFound(_) => FailureKind::NotFound,
            Self::NotRoomOwner(..) | Self::NotGameOwner(..) => {
                FailureKind::Unauthorized
            }
            Self::RoomClosed(_)
            | Self::AlreadyStarted(_)
            | Self::AlreadyEnded(_) => FailureKind::Conflict,
        }
    }
}

//! Unified error type for the lobby.

use lobby_network::NetworkError;
use lobby_protocol::{FailureKind, UserId};
use lobby_room::{GameError, RoomError};
use lobby_session::SessionError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each wrapped variant generates a `From`
/// impl, so `?` converts sub-crate errors automatically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LobbyError {
    /// A user registry error (bad password, failed login).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A network error (not found, wrong password, full).
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// A room error (full, not found, invalid state).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// A game error (not owner, already started, already ended).
    #[error(transparent)]
    Game(#[from] GameError),

    /// A user id that isn't registered was passed in.
    #[error("user {0} not found")]
    UnknownUser(UserId),

    /// The client has no logged-in user.
    #[error("log in first")]
    NotLoggedIn,

    /// The client is already connected.
    #[error("already connected")]
    AlreadyConnected,

    /// The client is not connected.
    #[error("not connected")]
    NotConnected,
}

impl LobbyError {
    /// Returns the failure category of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Session(e) => e.kind(),
            Self::Network(e) => e.kind(),
            Self::Room(e) => e.kind(),
            Self::Game(e) => e.kind(),
            Self::UnknownUser(_) => FailureKind::NotFound,
            Self::NotLoggedIn => FailureKind::Unauthorized,
            Self::AlreadyConnected | Self::NotConnected => FailureKind::Conflict,
        }
    }
}

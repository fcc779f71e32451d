//! Error types for the network layer.

use lobby_protocol::{FailureKind, NetworkId, UserId};

/// Errors that can occur during network operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// The would-be owner isn't a registered user.
    #[error("owner {0} not found")]
    OwnerNotFound(UserId),

    /// The network does not exist (or was closed).
    #[error("network {0} not found")]
    NotFound(NetworkId),

    /// Only the owner may close a network.
    #[error("only the owner can close network {1} (requested by {0})")]
    NotOwner(UserId, NetworkId),

    /// The network has a password and the one given didn't match.
    #[error("wrong password for network {0}")]
    WrongPassword(NetworkId),

    /// The user is already a participant.
    #[error("user {0} already in network {1}")]
    AlreadyParticipant(UserId, NetworkId),

    /// The network reached its participant limit.
    #[error("network {0} is full")]
    NetworkFull(NetworkId),

    /// The user is not a participant.
    #[error("user {0} not in network {1}")]
    NotParticipant(UserId, NetworkId),

    /// Owners stay in their network until they close it.
    #[error("the owner cannot leave network {0}, close it instead")]
    OwnerCannotLeave(NetworkId),
}

impl NetworkError {
    /// Returns the failure category of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::OwnerNotFound(_) | Self::NotFound(_) => FailureKind::NotFound,
            Self::NotOwner(..) | Self::WrongPassword(_) => {
                FailureKind::Unauthorized
            }
            Self::AlreadyParticipant(..)
            | Self::NetworkFull(_)
            | Self::NotParticipant(..)
            | Self::OwnerCannotLeave(_) => FailureKind::Conflict,
        }
    }
}

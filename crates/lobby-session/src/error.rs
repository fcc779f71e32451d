//! Error types for the session layer.

use lobby_protocol::{FailureKind, UserId};

/// Errors that can occur while registering or resolving users.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The password was missing or shorter than the configured minimum.
    #[error("password must be at least {min_len} characters")]
    InvalidPassword { min_len: usize },

    /// No user matched the given name and password.
    #[error("invalid name or password")]
    AuthFailed,

    /// No user is registered under this id.
    #[error("user {0} not found")]
    UserNotFound(UserId),
}

impl SessionError {
    /// Returns the failure category of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidPassword { .. } => FailureKind::Validation,
            Self::AuthFailed => FailureKind::Unauthorized,
            Self::UserNotFound(_) => FailureKind::NotFound,
        }
    }
}

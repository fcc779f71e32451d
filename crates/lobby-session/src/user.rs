//! User records and registration settings.

use lobby_protocol::UserId;
use serde::Serialize;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for user registration.
///
/// The password rule is a reproducible validation rule, not a security
/// measure: passwords are stored and compared as plain text.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Minimum password length, counted in characters.
    ///
    /// Default: 3.
    pub min_password_len: usize,

    /// Name given to users who register with a blank name.
    pub default_user_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_password_len: 3,
            default_user_name: "New player".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered user.
///
/// Immutable once created. The password is kept private and is never
/// serialized; use [`User::verify`] to compare against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique, monotonically assigned id.
    pub id: UserId,

    /// Display name. Not unique.
    pub name: String,

    #[serde(skip)]
    password: String,
}

impl User {
    pub(crate) fn new(id: UserId, name: String, password: String) -> Self {
        Self { id, name, password }
    }

    /// Returns `true` if `name` and `password` both match this user.
    pub fn matches(&self, name: &str, password: &str) -> bool {
        self.name == name && self.verify(password)
    }

    /// Plain equality against the stored password.
    pub fn verify(&self, password: &str) -> bool {
        self.password == password
    }
}

//! The user registry: every account the lobby knows about.
//!
//! Users are only ever added. There is no update or delete, so ids stay
//! valid for the lifetime of the registry and the insertion order never
//! changes.

use std::collections::HashMap;

use lobby_protocol::UserId;

use crate::{SessionConfig, SessionError, User};

/// Owns the set of registered users.
///
/// Users are stored in insertion order, with an id → position index for
/// O(1) lookups. Insertion order matters for [`authenticate`], which
/// resolves duplicate names to the earliest account.
///
/// [`authenticate`]: UserRegistry::authenticate
pub struct UserRegistry {
    users: Vec<User>,

    /// Index from user id to position in `users`. Kept in sync with
    /// `users`; since nothing is ever removed, positions never shift.
    index: HashMap<UserId, usize>,

    next_id: u64,

    config: SessionConfig,
}

impl UserRegistry {
    /// Creates an empty registry.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            users: Vec::new(),
            index: HashMap::new(),
            next_id: 1,
            config,
        }
    }

    /// Registers a new user and returns a copy of the record.
    ///
    /// A blank `name` is replaced with the configured default name.
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidPassword`] if `password` is `None`
    /// or shorter than `config.min_password_len` characters. Nothing is
    /// stored in that case and no id is consumed.
    pub fn create_user(
        &mut self,
        name: &str,
        password: Option<&str>,
    ) -> Result<User, SessionError> {
        let min_len = self.config.min_password_len;
        let password = match password {
            Some(p) if p.chars().count() >= min_len => p,
            _ => return Err(SessionError::InvalidPassword { min_len }),
        };

        let name = if name.trim().is_empty() {
            self.config.default_user_name.clone()
        } else {
            name.to_string()
        };

        let id = UserId(self.next_id);
        self.next_id += 1;

        let user = User::new(id, name, password.to_string());
        self.index.insert(id, self.users.len());
        self.users.push(user.clone());

        tracing::info!(user_id = %id, name = %user.name, "user created");
        Ok(user)
    }

    /// Looks up a user by id.
    pub fn get_user(&self, id: UserId) -> Option<&User> {
        self.index.get(&id).map(|&pos| &self.users[pos])
    }

    /// Returns `true` if a user with this id exists.
    pub fn contains(&self, id: UserId) -> bool {
        self.index.contains_key(&id)
    }

    /// Returns the first user (in registration order) whose name and
    /// password both match.
    ///
    /// Names are not unique. When two accounts share a name, the later
    /// one can only be reached by login if its password differs.
    pub fn authenticate(&self, name: &str, password: &str) -> Option<&User> {
        let user = self.users.iter().find(|u| u.matches(name, password));
        match user {
            Some(u) => tracing::info!(user_id = %u.id, "user authenticated"),
            None => tracing::debug!(%name, "authentication failed"),
        }
        user
    }

    /// Returns copies of all users in registration order.
    ///
    /// The returned records are owned; changing them doesn't touch the
    /// registry.
    pub fn list_users(&self) -> Vec<User> {
        self.users.clone()
    }

    /// Returns the display name for `id`, or a `User_{n}` placeholder for
    /// ids that don't resolve.
    pub fn display_name(&self, id: UserId) -> String {
        self.get_user(id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| format!("User_{}", id.0))
    }

    /// Returns the number of registered users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if nobody has registered yet.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

// =========================================================================
// Tests
// =========================================================================

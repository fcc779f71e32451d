//! Room records and creation requests.

use std::time::SystemTime;

use lobby_protocol::{RoomId, UserId};
use serde::Serialize;

use crate::{RoomAccess, RoomError, RoomStatus};

/// Parameters for creating a room.
///
/// Build one with [`NewRoom::public`] / [`NewRoom::private`], or with
/// [`NewRoom::parse`] when the access mode arrives as raw text from a
/// form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    pub owner_id: UserId,
    pub access: RoomAccess,
    pub password: Option<String>,
    pub max_players: usize,
    /// Display name. `None` or blank gets a generated name.
    pub name: Option<String>,
}

impl NewRoom {
    /// A public room with no password.
    pub fn public(owner_id: UserId, max_players: usize) -> Self {
        Self {
            owner_id,
            access: RoomAccess::Public,
            password: None,
            max_players,
            name: None,
        }
    }

    /// A private room guarded by `password`.
    pub fn private(
        owner_id: UserId,
        password: impl Into<String>,
        max_players: usize,
    ) -> Self {
        Self {
            owner_id,
            access: RoomAccess::Private,
            password: Some(password.into()),
            max_players,
            name: None,
        }
    }

    /// Builds a request from raw form input, passed through verbatim.
    ///
    /// # Errors
    /// Returns [`RoomError::InvalidAccess`] if `access` is neither
    /// `public` nor `private`. The remaining rules are checked by
    /// [`RoomRegistry::create_room`](crate::RoomRegistry::create_room).
    pub fn parse(
        owner_id: UserId,
        access: &str,
        password: Option<&str>,
        max_players: usize,
        name: Option<&str>,
    ) -> Result<Self, RoomError> {
        Ok(Self {
            owner_id,
            access: access.parse()?,
            password: password.map(str::to_string),
            max_players,
            name: name.map(str::to_string),
        })
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A room (game lobby).
///
/// `participants` is ordered by join time with the owner first. The
/// password is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub id: RoomId,
    pub owner_id: UserId,
    pub access: RoomAccess,
    #[serde(skip)]
    pub(crate) password: Option<String>,
    pub max_players: usize,
    pub name: String,
    pub participants: Vec<UserId>,
    pub status: RoomStatus,
    pub created_at: SystemTime,
}

impl Room {
    /// Returns `true` if `user_id` is a participant.
    pub fn contains(&self, user_id: UserId) -> bool {
        self.participants.contains(&user_id)
    }

    /// Returns `true` if no player slots are left.
    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_players
    }

    /// Returns `true` if the room is password protected.
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }
}

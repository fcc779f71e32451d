//! Room registry: creates rooms, tracks membership, closes and deletes them.

use std::collections::HashMap;
use std::time::SystemTime;

use lobby_protocol::{RoomId, UserId};

use crate::{NewRoom, Room, RoomAccess, RoomConfig, RoomError, RoomStatus};

/// Owns every room and its lifecycle.
///
/// The registry is the only place room status changes, except for the
/// `waiting → started` flip which is reserved for
/// [`GameCoordinator`](crate::GameCoordinator) through a crate-private
/// method.
pub struct RoomRegistry {
    /// All rooms that haven't been deleted, keyed by room id.
    rooms: HashMap<RoomId, Room>,

    /// Maps each owner to their waiting or started room.
    /// An owner can hold at most ONE such room (key invariant).
    active_by_owner: HashMap<UserId, RoomId>,

    next_id: u64,

    config: RoomConfig,
}

impl RoomRegistry {
    /// Creates a new, empty registry.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            active_by_owner: HashMap::new(),
            next_id: 1,
            config,
        }
    }

    /// Creates a room in `waiting` with the owner as its only participant.
    ///
    /// Checks run in order and nothing is stored on failure:
    /// private rooms need a non-empty password, `max_players` must reach
    /// `config.min_players`, and the owner must not already hold a
    /// waiting or started room.
    pub fn create_room(&mut self, new_room: NewRoom) -> Result<Room, RoomError> {
        let NewRoom {
            owner_id,
            access,
            password,
            max_players,
            name,
        } = new_room;

        let password = password.filter(|p| !p.is_empty());
        if access == RoomAccess::Private && password.is_none() {
            return Err(RoomError::MissingPassword);
        }

        if max_players < self.config.min_players {
            return Err(RoomError::TooFewPlayers {
                requested: max_players,
                min: self.config.min_players,
            });
        }

        if let Some(&existing) = self.active_by_owner.get(&owner_id) {
            tracing::debug!(
                %owner_id,
                room_id = %existing,
                "owner already has an active room"
            );
            return Err(RoomError::OwnerHasActiveRoom(owner_id, existing));
        }

        let id = RoomId(self.next_id);
        self.next_id += 1;

        let name = match name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => format!("{} {}", self.config.default_name_prefix, id.0),
        };

        let room = Room {
            id,
            owner_id,
            access,
            // Public rooms never check a password, so don't keep one.
            password: match access {
                RoomAccess::Private => password,
                RoomAccess::Public => None,
            },
            max_players,
            name,
            participants: vec![owner_id],
            status: RoomStatus::Waiting,
            created_at: SystemTime::now(),
        };

        self.rooms.insert(id, room.clone());
        self.active_by_owner.insert(owner_id, id);

        tracing::info!(
            room_id = %id,
            %owner_id,
            %access,
            max_players,
            name = %room.name,
            "room created"
        );
        Ok(room)
    }

    /// Adds `user_id` to a waiting room.
    ///
    /// A started or closed room always rejects the join, before the
    /// password or capacity are looked at.
    pub fn join_room(
        &mut self,
        room_id: RoomId,
        user_id: UserId,
        password: Option<&str>,
    ) -> Result<(), RoomError> {
        let room = self
            .rooms
            .get_mut(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;

        if !room.status.is_joinable() {
            return Err(RoomError::NotWaiting(room_id, room.status));
        }

        if room.access == RoomAccess::Private {
            match password.filter(|p| !p.is_empty()) {
                None => return Err(RoomError::PasswordRequired(room_id)),
                Some(p) if room.password.as_deref() != Some(p) => {
                    return Err(RoomError::WrongPassword(room_id));
                }
                Some(_) => {}
            }
        }

        if room.contains(user_id) {
            return Err(RoomError::AlreadyInRoom(user_id, room_id));
        }

        if room.is_full() {
            return Err(RoomError::RoomFull(room_id));
        }

        room.participants.push(user_id);
        tracing::info!(
            %room_id,
            %user_id,
            players = room.participants.len(),
            "user joined room"
        );
        Ok(())
    }

    /// Removes a non-owner participant from a waiting room.
    pub fn leave_room(
        &mut self,
        room_id: RoomId,
        user_id: UserId,
    ) -> Result<(), RoomError> {
        let room = self
            .rooms
            .get_mut(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;

        if !room.status.is_joinable() {
            return Err(RoomError::NotWaiting(room_id, room.status));
        }
        if user_id == room.owner_id {
            return Err(RoomError::OwnerCannotLeave(room_id));
        }

        let pos = room
            .participants
            .iter()
            .position(|&p| p == user_id)
            .ok_or(RoomError::NotInRoom(user_id, room_id))?;
        room.participants.remove(pos);

        tracing::info!(
            %room_id,
            %user_id,
            players = room.participants.len(),
            "user left room"
        );
        Ok(())
    }

    /// Closes a room. Owner only.
    ///
    /// Closing twice is an error rather than a silent success.
    pub fn close_room(
        &mut self,
        room_id: RoomId,
        requester_id: UserId,
    ) -> Result<(), RoomError> {
        let room = self
            .rooms
            .get_mut(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;

        if room.owner_id != requester_id {
            return Err(RoomError::NotOwner(requester_id, room_id));
        }
        if room.status == RoomStatus::Closed {
            return Err(RoomError::AlreadyClosed(room_id));
        }

        room.status = RoomStatus::Closed;
        let owner_id = room.owner_id;
        self.release_owner(owner_id, room_id);

        tracing::info!(%room_id, "room closed");
        Ok(())
    }

    /// Removes a room from the registry entirely. Owner only.
    ///
    /// Unlike [`close_room`](Self::close_room) this works in any status,
    /// and the id stops resolving afterwards.
    pub fn delete_room(
        &mut self,
        room_id: RoomId,
        requester_id: UserId,
    ) -> Result<Room, RoomError> {
        let room = self
            .rooms
            .get(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;

        if room.owner_id != requester_id {
            return Err(RoomError::NotOwner(requester_id, room_id));
        }

        let owner_id = room.owner_id;
        self.release_owner(owner_id, room_id);
        let removed = self
            .rooms
            .remove(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;

        tracing::info!(%room_id, "room deleted");
        Ok(removed)
    }

    /// Flips a waiting room to `started`. Callers check the preconditions.
    pub(crate) fn mark_started(&mut self, room_id: RoomId) {
        if let Some(room) = self.rooms.get_mut(&room_id) {
            debug_assert!(room.status.can_transition_to(RoomStatus::Started));
            room.status = RoomStatus::Started;
        }
    }

    /// Closes every waiting or started room on behalf of its owner.
    ///
    /// Returns the ids of the rooms that were closed. Used by the
    /// shutdown sweep.
    pub fn close_all_active(&mut self) -> Vec<RoomId> {
        let targets: Vec<(RoomId, UserId)> = self
            .get_active_rooms()
            .into_iter()
            .map(|r| (r.id, r.owner_id))
            .collect();

        targets
            .into_iter()
            .filter(|&(room_id, owner_id)| {
                self.close_room(room_id, owner_id).is_ok()
            })
            .map(|(room_id, _)| room_id)
            .collect()
    }

    /// Returns the room, if it exists.
    pub fn get_room(&self, room_id: RoomId) -> Option<&Room> {
        self.rooms.get(&room_id)
    }

    /// Returns a copy of the room.
    pub fn get_room_info(&self, room_id: RoomId) -> Result<Room, RoomError> {
        self.rooms
            .get(&room_id)
            .cloned()
            .ok_or(RoomError::NotFound(room_id))
    }

    /// Returns the participants in join order, owner first.
    pub fn get_room_participants(
        &self,
        room_id: RoomId,
    ) -> Result<Vec<UserId>, RoomError> {
        self.rooms
            .get(&room_id)
            .map(|r| r.participants.clone())
            .ok_or(RoomError::NotFound(room_id))
    }

    /// Lists rooms that are waiting or started, ordered by id.
    ///
    /// This is what a lobby view renders.
    pub fn get_active_rooms(&self) -> Vec<Room> {
        let mut rooms: Vec<Room> = self
            .rooms
            .values()
            .filter(|r| r.status.is_active())
            .cloned()
            .collect();
        rooms.sort_by_key(|r| r.id);
        rooms
    }

    /// Lists every room that hasn't been deleted, ordered by id.
    pub fn list_rooms(&self) -> Vec<Room> {
        let mut rooms: Vec<Room> = self.rooms.values().cloned().collect();
        rooms.sort_by_key(|r| r.id);
        rooms
    }

    /// Returns the owner's waiting or started room, if any.
    pub fn active_room_of(&self, owner_id: UserId) -> Option<RoomId> {
        self.active_by_owner.get(&owner_id).copied()
    }

    /// Returns the number of rooms (any status).
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn release_owner(&mut self, owner_id: UserId, room_id: RoomId) {
        if self.active_by_owner.get(&owner_id) == Some(&room_id) {
            self.active_by_owner.remove(&owner_id);
        }
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}

// =========================================================================
// Tests
// =========================================================================

//! Game coordinator: starts games from rooms and ends them again.
//!
//! Games never exist on their own. Starting one flips its room from
//! `waiting` to `started`; ending one closes the room. Both registries are
//! passed in together so the caller can hold both locks for the whole
//! operation.

use std::collections::HashMap;
use std::time::SystemTime;

use lobby_protocol::{GameId, RoomId, UserId};

use crate::{Game, GameEnded, GameError, GameStatus, RoomRegistry, RoomStatus};

/// Owns every game record.
pub struct GameCoordinator {
    games: HashMap<GameId, Game>,

    /// The active game of each room. A room has at most one.
    active_by_room: HashMap<RoomId, GameId>,

    next_id: u64,
}

impl GameCoordinator {
    /// Creates a coordinator with no games.
    pub fn new() -> Self {
        Self {
            games: HashMap::new(),
            active_by_room: HashMap::new(),
            next_id: 1,
        }
    }

    /// Starts a game in a waiting room. Room owner only.
    ///
    /// Snapshots the room's participants into the game and moves the room
    /// to `started`, which freezes its membership.
    pub fn start_game(
        &mut self,
        rooms: &mut RoomRegistry,
        room_id: RoomId,
        requester_id: UserId,
    ) -> Result<Game, GameError> {
        let room = rooms
            .get_room(room_id)
            .ok_or(GameError::RoomNotFound(room_id))?;

        if room.owner_id != requester_id {
            return Err(GameError::NotRoomOwner(requester_id, room_id));
        }
        match room.status {
            RoomStatus::Closed => return Err(GameError::RoomClosed(room_id)),
            RoomStatus::Started => {
                return Err(GameError::AlreadyStarted(room_id));
            }
            RoomStatus::Waiting => {}
        }
        if self.active_by_room.contains_key(&room_id) {
            return Err(GameError::AlreadyStarted(room_id));
        }

        let id = GameId(self.next_id);
        self.next_id += 1;

        let game = Game {
            id,
            room_id,
            owner_id: requester_id,
            participants: room.participants.clone(),
            status: GameStatus::Active,
            created_at: SystemTime::now(),
            ended_at: None,
        };

        rooms.mark_started(room_id);
        self.games.insert(id, game.clone());
        self.active_by_room.insert(room_id, id);

        tracing::info!(
            game_id = %id,
            %room_id,
            players = game.participants.len(),
            "game started"
        );
        Ok(game)
    }

    /// Ends a game and closes its room. Game owner only.
    ///
    /// If the room can't be closed, the game still ends and the failure
    /// is reported inside the returned [`GameEnded`].
    pub fn close_game(
        &mut self,
        rooms: &mut RoomRegistry,
        game_id: GameId,
        requester_id: UserId,
    ) -> Result<GameEnded, GameError> {
        let game = self
            .games
            .get_mut(&game_id)
            .ok_or(GameError::NotFound(game_id))?;

        if game.owner_id != requester_id {
            return Err(GameError::NotGameOwner(requester_id, game_id));
        }
        if game.status == GameStatus::Ended {
            return Err(GameError::AlreadyEnded(game_id));
        }

        game.status = GameStatus::Ended;
        game.ended_at = Some(SystemTime::now());
        let game = game.clone();
        self.active_by_room.remove(&game.room_id);

        let room_closure = rooms.close_room(game.room_id, requester_id);
        match &room_closure {
            Ok(()) => tracing::info!(
                %game_id,
                room_id = %game.room_id,
                "game ended, room closed"
            ),
            Err(e) => tracing::warn!(
                %game_id,
                room_id = %game.room_id,
                error = %e,
                "game ended but room could not be closed"
            ),
        }

        Ok(GameEnded { game, room_closure })
    }

    /// Ends every active game (closing its room). Used by the shutdown
    /// sweep.
    pub fn end_all(&mut self, rooms: &mut RoomRegistry) -> Vec<GameEnded> {
        let active: Vec<(GameId, UserId)> = self
            .active_games()
            .into_iter()
            .map(|g| (g.id, g.owner_id))
            .collect();

        active
            .into_iter()
            .filter_map(|(game_id, owner_id)| {
                self.close_game(rooms, game_id, owner_id).ok()
            })
            .collect()
    }

    /// Returns the active game of a room, if there is one.
    pub fn get_game_by_room(&self, room_id: RoomId) -> Option<&Game> {
        self.active_by_room
            .get(&room_id)
            .and_then(|id| self.games.get(id))
    }

    /// Looks up a game by id (any status).
    pub fn get_game(&self, game_id: GameId) -> Option<&Game> {
        self.games.get(&game_id)
    }

    /// Lists active games, ordered by id.
    pub fn active_games(&self) -> Vec<Game> {
        let mut games: Vec<Game> = self
            .active_by_room
            .values()
            .filter_map(|id| self.games.get(id))
            .cloned()
            .collect();
        games.sort_by_key(|g| g.id);
        games
    }
}

impl Default for GameCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewRoom, RoomError};

    fn uid(id: u64) -> UserId {
        UserId(id)
    }

    /// A registry with one public room owned by user 1, joined by user 2.
    fn setup() -> (RoomRegistry, GameCoordinator, RoomId) {
        let mut rooms = RoomRegistry::default();
        let room = rooms.create_room(NewRoom::public(uid(1), 4)).unwrap().id;
        rooms.join_room(room, uid(2), None).unwrap();
        (rooms, GameCoordinator::new(), room)
    }

    // =====================================================================
    // start_game()
    // =====================================================================

    #[test]
    fn test_start_game_snapshots_participants_and_starts_room() {
        let (mut rooms, mut games, room) = setup();

        let game = games.start_game(&mut rooms, room, uid(1)).unwrap();

        assert_eq!(game.id, GameId(1));
        assert_eq!(game.room_id, room);
        assert_eq!(game.participants, vec![uid(1), uid(2)]);
        assert_eq!(game.status, GameStatus::Active);
        assert_eq!(rooms.get_room(room).unwrap().status, RoomStatus::Started);
        assert_eq!(games.get_game_by_room(room), Some(&game));
    }

    #[test]
    fn test_start_game_non_owner_fails_without_side_effects() {
        let (mut rooms, mut games, room) = setup();

        let result = games.start_game(&mut rooms, room, uid(2));

        assert_eq!(result, Err(GameError::NotRoomOwner(uid(2), room)));
        assert_eq!(rooms.get_room(room).unwrap().status, RoomStatus::Waiting);
        assert!(games.get_game_by_room(room).is_none());
    }

    #[test]
    fn test_start_game_twice_fails() {
        let (mut rooms, mut games, room) = setup();
        games.start_game(&mut rooms, room, uid(1)).unwrap();

        assert_eq!(
            games.start_game(&mut rooms, room, uid(1)),
            Err(GameError::AlreadyStarted(room))
        );
    }

    #[test]
    fn test_start_game_closed_room_fails() {
        let (mut rooms, mut games, room) = setup();
        rooms.close_room(room, uid(1)).unwrap();

        assert_eq!(
            games.start_game(&mut rooms, room, uid(1)),
            Err(GameError::RoomClosed(room))
        );
    }

    #[test]
    fn test_start_game_unknown_room_fails() {
        let mut rooms = RoomRegistry::default();
        let mut games = GameCoordinator::new();

        assert_eq!(
            games.start_game(&mut rooms, RoomId(5), uid(1)),
            Err(GameError::RoomNotFound(RoomId(5)))
        );
    }

    #[test]
    fn test_start_game_snapshot_is_detached_from_room() {
        let (mut rooms, mut games, room) = setup();
        let game = games.start_game(&mut rooms, room, uid(1)).unwrap();

        rooms.close_room(room, uid(1)).unwrap();
        rooms.delete_room(room, uid(1)).unwrap();

        assert_eq!(
            games.get_game(game.id).unwrap().participants,
            vec![uid(1), uid(2)]
        );
    }

    // =====================================================================
    // close_game()
    // =====================================================================

    #[test]
    fn test_close_game_ends_game_and_closes_room() {
        let (mut rooms, mut games, room) = setup();
        let game = games.start_game(&mut rooms, room, uid(1)).unwrap();

        let ended = games.close_game(&mut rooms, game.id, uid(1)).unwrap();

        assert!(ended.room_closed());
        assert_eq!(ended.game.status, GameStatus::Ended);
        assert!(ended.game.ended_at.is_some());
        assert_eq!(rooms.get_room(room).unwrap().status, RoomStatus::Closed);
        assert!(games.get_game_by_room(room).is_none());
        assert_eq!(
            games.get_game(game.id).unwrap().status,
            GameStatus::Ended
        );
        assert_eq!(
            ended.to_string(),
            format!("game {} ended and room {} closed", game.id, room)
        );
    }

    #[test]
    fn test_close_game_room_already_closed_is_partial_success() {
        let (mut rooms, mut games, room) = setup();
        let game = games.start_game(&mut rooms, room, uid(1)).unwrap();
        rooms.close_room(room, uid(1)).unwrap();

        let ended = games.close_game(&mut rooms, game.id, uid(1)).unwrap();

        assert!(!ended.room_closed());
        assert_eq!(ended.room_closure, Err(RoomError::AlreadyClosed(room)));
        assert_eq!(ended.game.status, GameStatus::Ended);
        assert!(ended.to_string().contains("could not be closed"));
    }

    #[test]
    fn test_close_game_room_deleted_is_partial_success() {
        let (mut rooms, mut games, room) = setup();
        let game = games.start_game(&mut rooms, room, uid(1)).unwrap();
        rooms.delete_room(room, uid(1)).unwrap();

        let ended = games.close_game(&mut rooms, game.id, uid(1)).unwrap();

        assert_eq!(ended.room_closure, Err(RoomError::NotFound(room)));
    }

    #[test]
    fn test_close_game_non_owner_fails() {
        let (mut rooms, mut games, room) = setup();
        let game = games.start_game(&mut rooms, room, uid(1)).unwrap();

        assert_eq!(
            games.close_game(&mut rooms, game.id, uid(2)),
            Err(GameError::NotGameOwner(uid(2), game.id))
        );
        assert_eq!(rooms.get_room(room).unwrap().status, RoomStatus::Started);
    }

    #[test]
    fn test_close_game_twice_fails() {
        let (mut rooms, mut games, room) = setup();
        let game = games.start_game(&mut rooms, room, uid(1)).unwrap();
        games.close_game(&mut rooms, game.id, uid(1)).unwrap();

        assert_eq!(
            games.close_game(&mut rooms, game.id, uid(1)),
            Err(GameError::AlreadyEnded(game.id))
        );
    }

    #[test]
    fn test_close_game_unknown_fails() {
        let (mut rooms, mut games, _) = setup();
        assert_eq!(
            games.close_game(&mut rooms, GameId(42), uid(1)),
            Err(GameError::NotFound(GameId(42)))
        );
    }

    // =====================================================================
    // end_all() / active_games()
    // =====================================================================

    #[test]
    fn test_end_all_ends_every_active_game() {
        let mut rooms = RoomRegistry::default();
        let mut games = GameCoordinator::new();
        let r1 = rooms.create_room(NewRoom::public(uid(1), 2)).unwrap().id;
        let r2 = rooms.create_room(NewRoom::public(uid(2), 2)).unwrap().id;
        games.start_game(&mut rooms, r1, uid(1)).unwrap();
        games.start_game(&mut rooms, r2, uid(2)).unwrap();
        assert_eq!(games.active_games().len(), 2);

        let ended = games.end_all(&mut rooms);

        assert_eq!(ended.len(), 2);
        assert!(games.active_games().is_empty());
        assert!(rooms.get_active_rooms().is_empty());
    }
}

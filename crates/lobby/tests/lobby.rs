//! Integration tests for the lobby facade and clients.

use lobby::prelude::*;

// =========================================================================
// Helpers
// =========================================================================

/// A lobby with two registered users, ann (1) and bob (2).
async fn lobby_with_two_users() -> (Lobby, UserId, UserId) {
    let lobby = Lobby::builder().build();
    let ann = lobby.create_user("ann", Some("password123")).await.unwrap();
    let bob = lobby.create_user("bob", Some("password456")).await.unwrap();
    (lobby, ann.id, bob.id)
}

// =========================================================================
// Identity
// =========================================================================

#[tokio::test]
async fn test_create_user_rejects_short_password() {
    let lobby = Lobby::default();

    let err = lobby.create_user("ann", Some("ab")).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Validation);

    let err = lobby.create_user("ann", None).await.unwrap_err();
    assert!(matches!(
        err,
        LobbyError::Session(SessionError::InvalidPassword { min_len: 3 })
    ));
    assert!(lobby.list_users().await.is_empty());
}

#[tokio::test]
async fn test_authenticate_first_match_wins() {
    let lobby = Lobby::default();
    let first = lobby.create_user("twin", Some("same")).await.unwrap();
    lobby.create_user("twin", Some("same")).await.unwrap();

    let found = lobby.authenticate("twin", "same").await.unwrap();
    assert_eq!(found.id, first.id);
    assert!(lobby.authenticate("twin", "other").await.is_none());
}

#[tokio::test]
async fn test_session_config_is_applied() {
    let lobby = Lobby::builder()
        .session_config(SessionConfig {
            min_password_len: 8,
            ..SessionConfig::default()
        })
        .build();

    assert!(lobby.create_user("ann", Some("short")).await.is_err());
    assert!(lobby.create_user("ann", Some("long enough")).await.is_ok());
}

// =========================================================================
// Connections
// =========================================================================

#[tokio::test]
async fn test_connect_derives_endpoint_and_reconnect_overwrites() {
    let (lobby, ann, _) = lobby_with_two_users().await;

    let first = lobby.connect(ann).await;
    assert_eq!(first.endpoint.host, "192.168.1.1");
    assert_eq!(first.endpoint.port, 8081);

    let second = lobby.connect(ann).await;
    assert_ne!(first.connection_id, second.connection_id);
    assert_eq!(lobby.get_connection(ann).await, Some(second));

    assert!(lobby.disconnect(ann).await);
    assert!(!lobby.disconnect(ann).await);
    assert!(!lobby.is_connected(ann).await);
}

// =========================================================================
// Networks
// =========================================================================

#[tokio::test]
async fn test_network_join_notifies_and_close_disconnects() {
    let (lobby, ann, bob) = lobby_with_two_users().await;
    let net = lobby
        .create_network(ann, "Test network", Some("net123"))
        .await
        .unwrap();
    lobby.connect(ann).await;
    lobby.connect(bob).await;
    let mut ann_inbox = lobby.subscribe(ann).await;

    let err = lobby.join_network(net.id, bob, Some("nope")).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Unauthorized);
    lobby.join_network(net.id, bob, Some("net123")).await.unwrap();

    let n = ann_inbox.try_recv().unwrap();
    assert_eq!(n.kind, NotificationKind::Joined { user_id: bob });

    let closed = lobby.close_network(net.id, ann).await.unwrap();
    assert_eq!(closed.status, NetworkStatus::Closed);
    assert!(!lobby.is_connected(ann).await);
    assert!(!lobby.is_connected(bob).await);
    assert!(lobby.get_network_info(net.id).await.is_none());
}

#[tokio::test]
async fn test_create_network_unknown_owner_fails() {
    let lobby = Lobby::default();

    let err = lobby
        .create_network(UserId(7), "lan", None)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        LobbyError::Network(NetworkError::OwnerNotFound(UserId(7)))
    );
}

// =========================================================================
// Rooms and games
// =========================================================================

#[tokio::test]
async fn test_create_room_unknown_owner_fails() {
    let lobby = Lobby::default();

    let err = lobby
        .create_room(NewRoom::public(UserId(5), 4))
        .await
        .unwrap_err();

    assert_eq!(err, LobbyError::UnknownUser(UserId(5)));
    assert!(lobby.get_active_rooms().await.is_empty());
}

#[tokio::test]
async fn test_join_room_unknown_user_fails() {
    let (lobby, ann, _) = lobby_with_two_users().await;
    let room = lobby.create_room(NewRoom::public(ann, 4)).await.unwrap();

    let err = lobby.join_room(room.id, UserId(99), None).await.unwrap_err();

    assert_eq!(err, LobbyError::UnknownUser(UserId(99)));
    assert_eq!(lobby.get_room_participants(room.id).await.unwrap(), vec![ann]);
}

#[tokio::test]
async fn test_room_and_game_lifecycle() {
    let (lobby, ann, bob) = lobby_with_two_users().await;
    let room = lobby.create_room(NewRoom::public(ann, 4)).await.unwrap();
    lobby.join_room(room.id, bob, None).await.unwrap();

    let err = lobby.start_game(room.id, bob).await.unwrap_err();
    assert_eq!(err, LobbyError::Game(GameError::NotRoomOwner(bob, room.id)));

    let game = lobby.start_game(room.id, ann).await.unwrap();
    assert_eq!(game.participants, vec![ann, bob]);
    assert_eq!(
        lobby.get_room_info(room.id).await.unwrap().status,
        RoomStatus::Started
    );
    assert_eq!(lobby.get_game_by_room(room.id).await, Some(game.clone()));

    let ended = lobby.close_game(game.id, ann).await.unwrap();
    assert!(ended.room_closed());
    assert_eq!(
        lobby.get_room_info(room.id).await.unwrap().status,
        RoomStatus::Closed
    );
    assert!(lobby.get_game_by_room(room.id).await.is_none());
    assert_eq!(
        lobby.get_game(game.id).await.unwrap().status,
        GameStatus::Ended
    );
}

#[tokio::test]
async fn test_private_room_through_facade() {
    let (lobby, ann, bob) = lobby_with_two_users().await;
    let room = lobby
        .create_room(NewRoom::parse(ann, "private", Some("pw"), 4, Some(" Den ")).unwrap())
        .await
        .unwrap();
    assert_eq!(room.name, "Den");

    assert!(lobby.join_room(room.id, bob, None).await.is_err());
    assert!(lobby.join_room(room.id, bob, Some("wrong")).await.is_err());
    lobby.join_room(room.id, bob, Some("pw")).await.unwrap();
    lobby.leave_room(room.id, bob).await.unwrap();

    let deleted = lobby.delete_room(room.id, ann).await.unwrap();
    assert_eq!(deleted.id, room.id);
    assert!(matches!(
        lobby.get_room_info(room.id).await,
        Err(LobbyError::Room(RoomError::NotFound(_)))
    ));
}

#[tokio::test]
async fn test_concurrent_joins_respect_capacity() {
    let lobby = Lobby::default();
    let owner = lobby.create_user("owner", Some("pw1")).await.unwrap();
    let mut joiners = Vec::new();
    for i in 0..20 {
        let user = lobby
            .create_user(&format!("u{i}"), Some("pw1"))
            .await
            .unwrap();
        joiners.push(user.id);
    }
    let room_id = lobby
        .create_room(NewRoom::public(owner.id, 5))
        .await
        .unwrap()
        .id;

    let handles: Vec<_> = joiners
        .into_iter()
        .map(|user_id| {
            let lobby = lobby.clone();
            tokio::spawn(async move { lobby.join_room(room_id, user_id, None).await })
        })
        .collect();

    let mut joined = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            joined += 1;
        }
    }

    assert_eq!(joined, 4);
    assert_eq!(lobby.get_room_participants(room_id).await.unwrap().len(), 5);
}

// =========================================================================
// System
// =========================================================================

#[tokio::test]
async fn test_status_counts_everything() {
    let (lobby, ann, bob) = lobby_with_two_users().await;
    lobby.create_network(ann, "lan", None).await.unwrap();
    let room = lobby.create_room(NewRoom::public(ann, 2)).await.unwrap();
    lobby.create_room(NewRoom::public(bob, 2)).await.unwrap();
    lobby.start_game(room.id, ann).await.unwrap();
    lobby.connect(ann).await;

    let status = lobby.status().await;

    assert_eq!(status.users_count, 2);
    assert_eq!(status.active_connections, 1);
    assert_eq!(status.active_networks.len(), 1);
    assert_eq!(status.active_rooms.len(), 2);
    assert_eq!(status.active_games, 1);

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["active_rooms"][0]["status"], "started");
    assert_eq!(json["active_rooms"][1]["status"], "waiting");
}

#[tokio::test]
async fn test_shutdown_drains_everything() {
    let (lobby, ann, bob) = lobby_with_two_users().await;
    let net = lobby.create_network(ann, "lan", None).await.unwrap();
    lobby.join_network(net.id, bob, None).await.unwrap();
    let started = lobby.create_room(NewRoom::public(ann, 2)).await.unwrap();
    let waiting = lobby.create_room(NewRoom::public(bob, 2)).await.unwrap();
    let game = lobby.start_game(started.id, ann).await.unwrap();
    lobby.connect(ann).await;
    lobby.connect(bob).await;

    let report = lobby.shutdown().await;

    assert_eq!(report.games_ended, vec![game.id]);
    assert_eq!(report.rooms_closed, vec![waiting.id]);
    assert_eq!(report.networks_closed, vec![net.id]);
    assert_eq!(report.disconnected, 0, "closing the network disconnected both");

    let status = lobby.status().await;
    assert_eq!(status.users_count, 2, "users survive shutdown");
    assert_eq!(status.active_connections, 0);
    assert!(status.active_networks.is_empty());
    assert!(status.active_rooms.is_empty());
    assert_eq!(status.active_games, 0);
}

// =========================================================================
// Client
// =========================================================================

#[tokio::test]
async fn test_client_requires_login() {
    let lobby = Lobby::default();
    let mut client = lobby.create_client();

    assert_eq!(client.connect(None).await, Err(LobbyError::NotLoggedIn));
    assert_eq!(client.disconnect().await, Err(LobbyError::NotLoggedIn));
    assert_eq!(client.send_message("hi").await, Err(LobbyError::NotLoggedIn));

    let err = client.login("ghost", "pw1").await.unwrap_err();
    assert_eq!(err, LobbyError::Session(SessionError::AuthFailed));
}

#[tokio::test]
async fn test_client_connect_disconnect_cycle() {
    let (lobby, ann, _) = lobby_with_two_users().await;
    let mut client = lobby.create_client();
    client.login("ann", "password123").await.unwrap();

    let info = client.connect(Some(NetworkId(1))).await.unwrap();
    assert_eq!(info.user_id, ann);
    assert_eq!(client.connect(None).await, Err(LobbyError::AlreadyConnected));

    let status = client.status().await;
    assert!(status.connected);
    assert_eq!(status.network_id, Some(NetworkId(1)));

    client.disconnect().await.unwrap();
    assert_eq!(client.disconnect().await, Err(LobbyError::NotConnected));
    assert_eq!(client.send_message("hi").await, Err(LobbyError::NotConnected));
    assert!(!client.status().await.connected);
}

#[tokio::test]
async fn test_client_register_logs_in() {
    let lobby = Lobby::default();
    let mut client = lobby.create_client();

    let user = client.register("cid", "secret").await.unwrap();

    assert_eq!(client.user_id(), Some(user.id));
    assert!(client.connect(None).await.is_ok());
    assert!(client.send_message("hello").await.is_ok());
}

#[tokio::test]
async fn test_client_message_reaches_network_host() {
    let (lobby, ann, bob) = lobby_with_two_users().await;
    let net = lobby.create_network(ann, "lan", None).await.unwrap();
    lobby.join_network(net.id, bob, None).await.unwrap();

    let mut host = lobby.create_client();
    host.login("ann", "password123").await.unwrap();
    host.connect(Some(net.id)).await.unwrap();

    let mut guest = lobby.create_client();
    guest.login("bob", "password456").await.unwrap();
    guest.connect(Some(net.id)).await.unwrap();

    guest.send_message("hello host").await.unwrap();
    assert!(lobby.unicast_notify(bob, "welcome").await);

    let n = host.try_recv_notification().unwrap();
    assert_eq!(n.kind, NotificationKind::Message { from: bob });
    assert_eq!(n.message, "bob: hello host");
    assert_eq!(guest.try_recv_notification().unwrap().message, "welcome");
    assert!(guest.try_recv_notification().is_none());

    let report = lobby.broadcast(net.id, "Game starts!").await.unwrap();
    assert_eq!(report.delivered, 2);
}

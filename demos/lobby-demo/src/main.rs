use lobby::prelude::*;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Walkthrough
// ---------------------------------------------------------------------------

/// Drives every layer of the lobby once, printing what happens.
async fn run(lobby: &Lobby) -> Result<ShutdownReport, LobbyError> {
    println!("1. Users");
    let p1 = lobby.create_user("Player1", Some("password123")).await?;
    let p2 = lobby.create_user("Player2", Some("password456")).await?;
    println!("   created {} ({}) and {} ({})", p1.name, p1.id, p2.name, p2.id);

    println!("2. Clients and login");
    let mut client1 = lobby.create_client();
    let mut client2 = lobby.create_client();
    client1.login("Player1", "password123").await?;
    client2.login("Player2", "password456").await?;

    println!("3. Network");
    let network = lobby
        .create_network(p1.id, "Test network", Some("net123"))
        .await?;
    let info = client1.connect(Some(network.id)).await?;
    println!("   {} connected from {}", p1.name, info.endpoint);
    let info = client2.connect(Some(network.id)).await?;
    println!("   {} connected from {}", p2.name, info.endpoint);
    lobby.join_network(network.id, p2.id, Some("net123")).await?;

    println!("4. Rooms");
    let room = lobby.create_room(NewRoom::public(p1.id, 4)).await?;
    println!("   created {} ({})", room.name, room.id);
    lobby.join_room(room.id, p2.id, None).await?;
    println!("   {} joined {}", p2.name, room.id);

    let game = lobby.start_game(room.id, p1.id).await?;
    println!("   {} started in {}", game.id, room.id);

    println!("5. Messages and notifications");
    client2.send_message("Hello everyone!").await?;
    lobby.post_message(network.id, p1.id, "Hello from Player1").await?;
    lobby.unicast_notify(p2.id, "Welcome!").await;
    let report = lobby.broadcast(network.id, "Game starts!").await?;
    println!(
        "   broadcast reached {}/{} participants",
        report.delivered, report.participants
    );
    for (name, client) in [(&p1.name, &mut client1), (&p2.name, &mut client2)] {
        while let Some(n) = client.try_recv_notification() {
            println!("   [{name}] {}", n.message);
        }
    }

    println!("6. System status");
    let status = lobby.status().await;
    println!(
        "{}",
        serde_json::to_string_pretty(&status).unwrap_or_default()
    );

    println!("7. Shutdown");
    let ended = lobby.close_game(game.id, p1.id).await?;
    println!("   {ended}");
    client1.disconnect().await?;
    client2.disconnect().await?;
    Ok(lobby.shutdown().await)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let lobby = Lobby::builder().build();
    let report = run(&lobby).await?;
    tracing::info!(
        networks = report.networks_closed.len(),
        rooms = report.rooms_closed.len(),
        "demo finished"
    );
    Ok(())
}

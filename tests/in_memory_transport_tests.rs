mod common;

use std::sync::Arc;

use battleships::{
    GameApi, InMemoryTransport, Message, RegistryConfig, SessionRegistry, Skeleton, Stub,
    Transport, PROTOCOL_VERSION,
};
use common::{local_scenario, networked_scenario};

fn spawn_server(registry: Arc<SessionRegistry>) -> (Stub<InMemoryTransport>, tokio::task::JoinHandle<()>) {
    let (server_transport, client_transport) = InMemoryTransport::pair();
    let server = tokio::spawn(async move {
        let mut skeleton = Skeleton::new(registry, server_transport);
        skeleton.run().await.unwrap();
    });
    (Stub::new(client_transport), server)
}

#[tokio::test(flavor = "multi_thread")]
async fn networked_game_over_in_memory() -> anyhow::Result<()> {
    let registry = Arc::new(SessionRegistry::new(RegistryConfig::seeded(11)));
    let (stub, server) = spawn_server(Arc::clone(&registry));
    networked_scenario(&stub).await?;
    drop(stub);
    server.await?;
    assert_eq!(registry.len(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn local_game_over_in_memory() -> anyhow::Result<()> {
    let registry = Arc::new(SessionRegistry::new(RegistryConfig::seeded(12)));
    let (stub, server) = spawn_server(registry);
    local_scenario(&stub).await?;
    drop(stub);
    server.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn two_clients_share_one_registry() -> anyhow::Result<()> {
    let registry = Arc::new(SessionRegistry::new(RegistryConfig::seeded(13)));
    let (host, host_server) = spawn_server(Arc::clone(&registry));
    let (guest, guest_server) = spawn_server(Arc::clone(&registry));

    let created = host.create_game(12).await?;
    let listed = guest.available_games().await?;
    assert_eq!(listed.len(), 1);
    let joined = guest.join_game(listed[0].game_id, "Guest").await?;
    assert!(joined.game_started);

    let host_view = host.game_status(created.game_id, created.player_id).await?;
    assert!(host_view.is_your_turn);
    assert_eq!(host_view.board_size, 12);
    let guest_view = guest.game_status(created.game_id, joined.player_id).await?;
    assert!(!guest_view.is_your_turn);

    drop(host);
    drop(guest);
    host_server.await?;
    guest_server.await?;
    Ok(())
}

#[tokio::test]
async fn skeleton_rejects_missing_handshake() -> anyhow::Result<()> {
    let registry = Arc::new(SessionRegistry::default());
    let (server_transport, mut client) = InMemoryTransport::pair();
    let server = tokio::spawn(async move {
        let mut skeleton = Skeleton::new(registry, server_transport);
        skeleton.run().await
    });
    client.send(Message::AvailableGames).await?;
    assert!(server.await?.is_err());
    Ok(())
}

#[tokio::test]
async fn skeleton_reports_version_mismatch() -> anyhow::Result<()> {
    let registry = Arc::new(SessionRegistry::default());
    let (server_transport, mut client) = InMemoryTransport::pair();
    let server = tokio::spawn(async move {
        let mut skeleton = Skeleton::new(registry, server_transport);
        skeleton.run().await
    });
    client
        .send(Message::Hello {
            version: PROTOCOL_VERSION + 1,
        })
        .await?;
    assert_eq!(
        client.recv().await?,
        Message::HelloAck {
            version: PROTOCOL_VERSION
        }
    );
    assert!(server.await?.is_err());
    Ok(())
}

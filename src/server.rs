use std::sync::Arc;

use anyhow::anyhow;
use log::{debug, info, log, warn, Level};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::Duration;

use crate::config::PROTOCOL_VERSION;
use crate::error::{ErrorKind, GameError};
use crate::protocol::Message;
use crate::registry::SessionRegistry;
use crate::transport::tcp::TcpTransport;
use crate::transport::Transport;

/// Serves one client connection against a shared registry.
pub struct Skeleton<T: Transport> {
    registry: Arc<SessionRegistry>,
    transport: T,
}

impl<T: Transport> Skeleton<T> {
    pub fn new(registry: Arc<SessionRegistry>, transport: T) -> Self {
        Self {
            registry,
            transport,
        }
    }

    /// Handshake, then answer requests until the peer goes away.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        match self.transport.recv().await? {
            Message::Hello { version } if version == PROTOCOL_VERSION => {
                self.transport
                    .send(Message::HelloAck {
                        version: PROTOCOL_VERSION,
                    })
                    .await?;
            }
            Message::Hello { version } => {
                self.transport
                    .send(Message::HelloAck {
                        version: PROTOCOL_VERSION,
                    })
                    .await?;
                return Err(anyhow!(
                    "Protocol version mismatch: expected {}, got {}",
                    PROTOCOL_VERSION,
                    version
                ));
            }
            other => return Err(anyhow!("Expected handshake, got {:?}", other)),
        }

        while let Ok(msg) = self.transport.recv().await {
            let reply = self.dispatch(msg)?;
            self.transport.send(reply).await?;
        }
        Ok(())
    }

    fn dispatch(&self, msg: Message) -> anyhow::Result<Message> {
        let registry = &self.registry;
        let reply = match msg {
            Message::CreateGame { board_size } => {
                registry.create_game(board_size).map(Message::GameCreated)
            }
            Message::JoinGame {
                game_id,
                player_name,
            } => registry
                .join_game(game_id, &player_name)
                .map(Message::GameJoined),
            Message::Shot {
                game_id,
                player_id,
                x,
                y,
            } => registry
                .shoot(game_id, player_id, x, y)
                .map(Message::ShotResult),
            Message::GameStatus { game_id, player_id } => registry
                .game_status(game_id, player_id)
                .map(Message::Status),
            Message::AvailableGames => Ok(Message::Games(registry.available_games())),
            Message::CreateLocalGame { board_size } => registry
                .create_local_game(board_size)
                .map(Message::LocalGameCreated),
            Message::LocalGameStatus { game_id } => registry
                .local_game_status(game_id)
                .map(Message::LocalStatus),
            Message::LocalShot { game_id, x, y } => registry
                .local_shot(game_id, x, y)
                .map(Message::ShotResult),
            other => return Err(anyhow!("Unexpected message from client: {:?}", other)),
        };
        Ok(reply.unwrap_or_else(|e| {
            log!(rejection_level(&e), "request rejected: {e}");
            Message::Error(e)
        }))
    }
}

/// Rejected requests are routine; an internal fault is not.
fn rejection_level(e: &GameError) -> Level {
    match e.kind() {
        ErrorKind::Internal => Level::Error,
        ErrorKind::Validation | ErrorKind::State => Level::Debug,
    }
}

/// Accept connections forever, serving each on its own task.
pub async fn serve(listener: TcpListener, registry: Arc<SessionRegistry>) -> anyhow::Result<()> {
    info!("listening on {}", listener.local_addr()?);
    let idle_timeout = registry.config().session_ttl;
    loop {
        let (stream, addr) = listener.accept().await?;
        debug!("connection from {addr}");
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            let transport = TcpTransport::with_timeout(stream, idle_timeout);
            let mut skeleton = Skeleton::new(registry, transport);
            if let Err(e) = skeleton.run().await {
                warn!("connection {addr} ended with an error: {e}");
            }
        });
    }
}

/// Periodically evict idle sessions, per the registry's configuration.
pub fn spawn_reaper(registry: Arc<SessionRegistry>) -> JoinHandle<()> {
    let period = registry.config().reap_interval.max(Duration::from_secs(1));
    let ttl = registry.config().session_ttl;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            registry.reap(ttl);
        }
    })
}

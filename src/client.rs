use anyhow::anyhow;
use tokio::sync::Mutex;

use crate::config::PROTOCOL_VERSION;
use crate::domain::*;
use crate::protocol::{GameApi, Message};
use crate::transport::Transport;

/// Client-side [`GameApi`] that forwards every call over a transport.
pub struct Stub<T: Transport> {
    inner: Mutex<StubState<T>>,
}

struct StubState<T> {
    transport: T,
    handshaken: bool,
}

impl<T: Transport> Stub<T> {
    pub fn new(transport: T) -> Self {
        Self {
            inner: Mutex::new(StubState {
                transport,
                handshaken: false,
            }),
        }
    }

    /// Send one request and wait for its reply. Performs the handshake on
    /// first use. A `Message::Error` reply becomes an error wrapping the
    /// [`GameError`](crate::GameError).
    async fn call(&self, request: Message) -> anyhow::Result<Message> {
        let mut state = self.inner.lock().await;
        if !state.handshaken {
            state
                .transport
                .send(Message::Hello {
                    version: PROTOCOL_VERSION,
                })
                .await?;
            match state.transport.recv().await? {
                Message::HelloAck { version } if version == PROTOCOL_VERSION => {
                    state.handshaken = true;
                }
                Message::HelloAck { version } => {
                    return Err(anyhow!(
                        "Protocol version mismatch: expected {}, got {}",
                        PROTOCOL_VERSION,
                        version
                    ))
                }
                other => return Err(anyhow!("Expected HelloAck, got {:?}", other)),
            }
        }
        state.transport.send(request).await?;
        match state.transport.recv().await? {
            Message::Error(e) => Err(e.into()),
            reply => Ok(reply),
        }
    }
}

fn unexpected(reply: Message) -> anyhow::Error {
    anyhow!("Unexpected reply: {:?}", reply)
}

#[async_trait::async_trait]
impl<T: Transport> GameApi for Stub<T> {
    async fn create_game(&self, board_size: i32) -> anyhow::Result<CreateGameResponse> {
        match self.call(Message::CreateGame { board_size }).await? {
            Message::GameCreated(res) => Ok(res),
            other => Err(unexpected(other)),
        }
    }

    async fn join_game(
        &self,
        game_id: GameId,
        player_name: &str,
    ) -> anyhow::Result<JoinGameResponse> {
        let request = Message::JoinGame {
            game_id,
            player_name: player_name.to_string(),
        };
        match self.call(request).await? {
            Message::GameJoined(res) => Ok(res),
            other => Err(unexpected(other)),
        }
    }

    async fn shoot(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        x: i32,
        y: i32,
    ) -> anyhow::Result<ShotResponse> {
        let request = Message::Shot {
            game_id,
            player_id,
            x,
            y,
        };
        match self.call(request).await? {
            Message::ShotResult(res) => Ok(res),
            other => Err(unexpected(other)),
        }
    }

    async fn game_status(
        &self,
        game_id: GameId,
        player_id: PlayerId,
    ) -> anyhow::Result<GameStatusResponse> {
        match self.call(Message::GameStatus { game_id, player_id }).await? {
            Message::Status(res) => Ok(res),
            other => Err(unexpected(other)),
        }
    }

    async fn available_games(&self) -> anyhow::Result<Vec<AvailableGame>> {
        match self.call(Message::AvailableGames).await? {
            Message::Games(games) => Ok(games),
            other => Err(unexpected(other)),
        }
    }

    async fn create_local_game(&self, board_size: i32) -> anyhow::Result<CreateLocalGameResponse> {
        match self.call(Message::CreateLocalGame { board_size }).await? {
            Message::LocalGameCreated(res) => Ok(res),
            other => Err(unexpected(other)),
        }
    }

    async fn local_game_status(&self, game_id: GameId) -> anyhow::Result<LocalGameStatusResponse> {
        match self.call(Message::LocalGameStatus { game_id }).await? {
            Message::LocalStatus(res) => Ok(res),
            other => Err(unexpected(other)),
        }
    }

    async fn local_shot(&self, game_id: GameId, x: i32, y: i32) -> anyhow::Result<ShotResponse> {
        match self.call(Message::LocalShot { game_id, x, y }).await? {
            Message::ShotResult(res) => Ok(res),
            other => Err(unexpected(other)),
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::domain::*;
use crate::error::GameError;
use crate::registry::SessionRegistry;

/// Messages exchanged between a client and the game server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// Opening handshake sent by the client.
    Hello { version: u8 },
    /// Server reply to [`Message::Hello`], carrying the server's version.
    HelloAck { version: u8 },

    CreateGame { board_size: i32 },
    JoinGame { game_id: GameId, player_name: String },
    Shot { game_id: GameId, player_id: PlayerId, x: i32, y: i32 },
    GameStatus { game_id: GameId, player_id: PlayerId },
    AvailableGames,
    CreateLocalGame { board_size: i32 },
    LocalGameStatus { game_id: GameId },
    LocalShot { game_id: GameId, x: i32, y: i32 },

    GameCreated(CreateGameResponse),
    GameJoined(JoinGameResponse),
    ShotResult(ShotResponse),
    Status(GameStatusResponse),
    Games(Vec<AvailableGame>),
    LocalGameCreated(CreateLocalGameResponse),
    LocalStatus(LocalGameStatusResponse),
    /// The request was rejected; no state changed.
    Error(GameError),
}

/// Game operations, served either in process or over a transport.
///
/// Rejections surface as an [`anyhow::Error`] wrapping a [`GameError`], so
/// callers can `downcast_ref::<GameError>()` whichever side they talk to.
#[async_trait::async_trait]
pub trait GameApi: Send + Sync {
    async fn create_game(&self, board_size: i32) -> anyhow::Result<CreateGameResponse>;
    async fn join_game(&self, game_id: GameId, player_name: &str)
        -> anyhow::Result<JoinGameResponse>;
    async fn shoot(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        x: i32,
        y: i32,
    ) -> anyhow::Result<ShotResponse>;
    async fn game_status(
        &self,
        game_id: GameId,
        player_id: PlayerId,
    ) -> anyhow::Result<GameStatusResponse>;
    async fn available_games(&self) -> anyhow::Result<Vec<AvailableGame>>;
    async fn create_local_game(&self, board_size: i32) -> anyhow::Result<CreateLocalGameResponse>;
    async fn local_game_status(&self, game_id: GameId) -> anyhow::Result<LocalGameStatusResponse>;
    async fn local_shot(&self, game_id: GameId, x: i32, y: i32) -> anyhow::Result<ShotResponse>;
}

#[async_trait::async_trait]
impl GameApi for SessionRegistry {
    async fn create_game(&self, board_size: i32) -> anyhow::Result<CreateGameResponse> {
        Ok(SessionRegistry::create_game(self, board_size)?)
    }

    async fn join_game(
        &self,
        game_id: GameId,
        player_name: &str,
    ) -> anyhow::Result<JoinGameResponse> {
        Ok(SessionRegistry::join_game(self, game_id, player_name)?)
    }

    async fn shoot(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        x: i32,
        y: i32,
    ) -> anyhow::Result<ShotResponse> {
        Ok(SessionRegistry::shoot(self, game_id, player_id, x, y)?)
    }

    async fn game_status(
        &self,
        game_id: GameId,
        player_id: PlayerId,
    ) -> anyhow::Result<GameStatusResponse> {
        Ok(SessionRegistry::game_status(self, game_id, player_id)?)
    }

    async fn available_games(&self) -> anyhow::Result<Vec<AvailableGame>> {
        Ok(SessionRegistry::available_games(self))
    }

    async fn create_local_game(&self, board_size: i32) -> anyhow::Result<CreateLocalGameResponse> {
        Ok(SessionRegistry::create_local_game(self, board_size)?)
    }

    async fn local_game_status(&self, game_id: GameId) -> anyhow::Result<LocalGameStatusResponse> {
        Ok(SessionRegistry::local_game_status(self, game_id)?)
    }

    async fn local_shot(&self, game_id: GameId, x: i32, y: i32) -> anyhow::Result<ShotResponse> {
        Ok(SessionRegistry::local_shot(self, game_id, x, y)?)
    }
}

//! Request results and board projections handed to callers.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::SessionState;

pub type GameId = Uuid;
pub type PlayerId = Uuid;

/// Outcome of a shot as reported to the shooter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotResult {
    Water,
    Hit,
    Sunk,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameResponse {
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub board_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGameResponse {
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub game_started: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotResponse {
    pub result: ShotResult,
    pub game_over: bool,
    pub winner_id: Option<PlayerId>,
    /// Shape name of the ship this shot sank, if any.
    pub ship_type_sunk: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatusResponse {
    pub game_id: GameId,
    pub state: SessionState,
    pub current_player_id: Option<PlayerId>,
    pub winner_id: Option<PlayerId>,
    pub board_size: usize,
    pub is_your_turn: bool,
    pub your_board: BoardView,
    /// Absent until a second player has joined.
    pub enemy_board: Option<BoardView>,
}

/// A networked game waiting for its second player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableGame {
    pub game_id: GameId,
    pub board_size: usize,
    pub created_at: SystemTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocalGameResponse {
    pub game_id: GameId,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub board_size: usize,
    pub current_player_id: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalGameStatusResponse {
    pub game_id: GameId,
    pub state: SessionState,
    pub current_player_id: PlayerId,
    pub winner_id: Option<PlayerId>,
    pub board_size: usize,
    pub current_player_name: String,
    pub current_player_board: BoardView,
    pub opponent_board: BoardView,
}

/// Viewer-scoped projection of a board. Cells are row-major: all of row
/// `y = 0` first, then `y = 1`, and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub size: usize,
    pub cells: Vec<CellView>,
}

impl BoardView {
    pub fn cell(&self, x: usize, y: usize) -> Option<&CellView> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.cells.get(y * self.size + x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub x: usize,
    pub y: usize,
    pub is_hit: bool,
    pub is_miss: bool,
    /// Only ever set on the viewer's own board.
    pub is_ship: bool,
}

//! Errors returned by board, session and registry operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ship::ShipKind;

/// How a [`GameError`] should be treated by whoever receives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed request; nothing was mutated.
    Validation,
    /// Request not allowed in the current session state; nothing was mutated.
    State,
    /// Internal fault that a caller cannot recover from.
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("game not found")]
    GameNotFound,
    #[error("game is already full")]
    GameAlreadyFull,
    #[error("game is not in progress")]
    NotInProgress,
    #[error("it's not your turn")]
    NotYourTurn,
    #[error("player does not hold a seat in this game")]
    UnknownPlayer,
    #[error("player not in this game")]
    PlayerNotInGame,
    #[error("this is not a local game")]
    NotALocalGame,
    #[error("cell ({x}, {y}) was already targeted")]
    CellAlreadyTargeted { x: usize, y: usize },
    #[error("coordinates ({x}, {y}) are out of bounds for board size {size}")]
    OutOfRange { x: i32, y: i32, size: usize },
    #[error("board size {0} is outside the supported range")]
    InvalidBoardSize(usize),
    #[error("{kind} cannot be placed on the given cells")]
    InvalidPlacement { kind: ShipKind },
    #[error("could not place {kind} after {attempts} attempts")]
    PlacementExhausted { kind: ShipKind, attempts: usize },
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::OutOfRange { .. }
            | GameError::InvalidBoardSize(_)
            | GameError::InvalidPlacement { .. } => ErrorKind::Validation,
            GameError::PlacementExhausted { .. } => ErrorKind::Internal,
            _ => ErrorKind::State,
        }
    }
}

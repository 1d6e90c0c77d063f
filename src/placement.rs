//! Randomized fleet placement.

use log::debug;
use rand::Rng;

use crate::board::Board;
use crate::config::{FLEET, MAX_PLACEMENT_ATTEMPTS};
use crate::error::GameError;
use crate::ship::{ShipId, ShipKind};

/// Place the full fleet on `board`, largest shapes first.
///
/// Fails with [`GameError::PlacementExhausted`] if any ship finds no legal
/// spot within [`MAX_PLACEMENT_ATTEMPTS`] draws. The board is left with
/// whatever ships were placed before the failure and should be discarded.
pub fn place_fleet<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> Result<(), GameError> {
    for kind in FLEET {
        place_ship(board, kind, rng)?;
    }
    Ok(())
}

/// Place one ship of `kind` at a random legal position.
pub fn place_ship<R: Rng + ?Sized>(
    board: &mut Board,
    kind: ShipKind,
    rng: &mut R,
) -> Result<ShipId, GameError> {
    for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
        let Some(cells) = kind.candidate(board.size(), rng) else {
            continue;
        };
        if board.can_place(&cells) {
            debug!("placed {kind} at {cells:?} after {attempt} attempt(s)");
            return Ok(board.insert_ship(kind, cells));
        }
    }
    Err(GameError::PlacementExhausted {
        kind,
        attempts: MAX_PLACEMENT_ATTEMPTS,
    })
}

//! Game board: cells, placed ships, and shot resolution.

use core::fmt;

use log::debug;
use rand::Rng;

use crate::config::{MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::domain::{BoardView, CellView, ShotResult};
use crate::error::GameError;
use crate::placement;
use crate::ship::{Ship, ShipId, ShipKind};

/// State of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Empty,
    Ship,
    Hit,
    Miss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    x: usize,
    y: usize,
    state: CellState,
    ship: Option<ShipId>,
}

impl Cell {
    pub fn state(&self) -> CellState {
        self.state
    }

    /// Ship occupying this cell, if any.
    pub fn ship(&self) -> Option<ShipId> {
        self.ship
    }
}

/// What a resolved shot did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    Water,
    Hit,
    /// The shot sank a ship of this shape.
    Sunk(ShipKind),
}

impl ShotOutcome {
    pub fn sunk_kind(self) -> Option<ShipKind> {
        match self {
            ShotOutcome::Sunk(kind) => Some(kind),
            _ => None,
        }
    }
}

impl From<ShotOutcome> for ShotResult {
    fn from(outcome: ShotOutcome) -> Self {
        match outcome {
            ShotOutcome::Water => ShotResult::Water,
            ShotOutcome::Hit => ShotResult::Hit,
            ShotOutcome::Sunk(_) => ShotResult::Sunk,
        }
    }
}

/// Square grid plus the fleet placed on it.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
    ships: Vec<Ship>,
}

impl Board {
    /// Create an empty board of side `size`.
    pub fn new(size: usize) -> Result<Self, GameError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(GameError::InvalidBoardSize(size));
        }
        let cells = (0..size * size)
            .map(|i| Cell {
                x: i % size,
                y: i / size,
                state: CellState::Empty,
                ship: None,
            })
            .collect();
        Ok(Self {
            size,
            cells,
            ships: Vec::new(),
        })
    }

    /// Create a board of side `size` carrying a full randomly placed fleet.
    pub fn with_fleet<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self, GameError> {
        let mut board = Self::new(size)?;
        placement::place_fleet(&mut board, rng)?;
        Ok(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.cells.get(y * self.size + x)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Returns `true` when every placed ship is sunk.
    pub fn fleet_destroyed(&self) -> bool {
        self.ships.iter().all(Ship::is_sunk)
    }

    /// Check whether `cells` could hold a new ship: all on the board, all
    /// empty, and none touching another ship, diagonals included.
    pub fn can_place(&self, cells: &[(usize, usize)]) -> bool {
        cells.iter().all(|&(x, y)| {
            match self.cell(x, y) {
                Some(cell) if cell.state == CellState::Empty => {}
                _ => return false,
            }
            self.neighbours(x, y).all(|n| {
                n.state != CellState::Ship || cells.contains(&(n.x, n.y))
            })
        })
    }

    /// Place a ship of `kind` on exactly `cells`.
    pub fn place(&mut self, kind: ShipKind, cells: &[(usize, usize)]) -> Result<ShipId, GameError> {
        if cells.len() != kind.len() || !self.can_place(cells) {
            return Err(GameError::InvalidPlacement { kind });
        }
        Ok(self.insert_ship(kind, cells.to_vec()))
    }

    /// Record an already validated placement.
    pub(crate) fn insert_ship(&mut self, kind: ShipKind, cells: Vec<(usize, usize)>) -> ShipId {
        let id = ShipId(self.ships.len());
        for &(x, y) in &cells {
            let idx = y * self.size + x;
            self.cells[idx].state = CellState::Ship;
            self.cells[idx].ship = Some(id);
        }
        self.ships.push(Ship::new(id, kind, cells));
        id
    }

    /// Resolve a shot at `(x, y)`, marking the cell hit or missed.
    pub fn fire(&mut self, x: i32, y: i32) -> Result<ShotOutcome, GameError> {
        let size = self.size;
        let (cx, cy) = match (usize::try_from(x), usize::try_from(y)) {
            (Ok(cx), Ok(cy)) if cx < size && cy < size => (cx, cy),
            _ => return Err(GameError::OutOfRange { x, y, size }),
        };
        let cell = &mut self.cells[cy * size + cx];
        match (cell.state, cell.ship) {
            (CellState::Hit | CellState::Miss, _) => {
                Err(GameError::CellAlreadyTargeted { x: cx, y: cy })
            }
            (CellState::Ship, Some(id)) => {
                cell.state = CellState::Hit;
                let ship = &mut self.ships[id.0];
                let outcome = if ship.register_hit() {
                    ShotOutcome::Sunk(ship.kind())
                } else {
                    ShotOutcome::Hit
                };
                debug!("shot at ({cx}, {cy}): {outcome:?}");
                Ok(outcome)
            }
            _ => {
                cell.state = CellState::Miss;
                debug!("shot at ({cx}, {cy}): water");
                Ok(ShotOutcome::Water)
            }
        }
    }

    /// Project the board for a viewer. Ship positions are included only
    /// when `reveal_ships` is set; hits and misses are always visible.
    pub fn view(&self, reveal_ships: bool) -> BoardView {
        let cells = self
            .cells
            .iter()
            .map(|c| CellView {
                x: c.x,
                y: c.y,
                is_hit: c.state == CellState::Hit,
                is_miss: c.state == CellState::Miss,
                is_ship: reveal_ships && matches!(c.state, CellState::Ship | CellState::Hit),
            })
            .collect();
        BoardView {
            size: self.size,
            cells,
        }
    }

    fn neighbours(&self, x: usize, y: usize) -> impl Iterator<Item = &Cell> + '_ {
        let xs = x.saturating_sub(1)..=(x + 1).min(self.size - 1);
        xs.flat_map(move |nx| {
            let ys = y.saturating_sub(1)..=(y + 1).min(self.size - 1);
            ys.filter_map(move |ny| self.cell(nx, ny))
        })
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{ size: {}, ships: {:?} }}", self.size, self.ships)?;
        for row in self.cells.chunks(self.size) {
            let line: String = row
                .iter()
                .map(|c| match c.state {
                    CellState::Empty => '.',
                    CellState::Ship => 'S',
                    CellState::Hit => 'X',
                    CellState::Miss => 'o',
                })
                .collect();
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}

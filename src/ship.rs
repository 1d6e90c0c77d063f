//! Ship shapes, candidate generation, and per-ship hit tracking.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Orientation of a straight ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Closed set of ship shapes a fleet is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipKind {
    /// One cell.
    Single,
    /// Two cells in a line.
    Double,
    /// Three cells in a line.
    Triple,
    /// Center cell plus one arm in each cardinal direction.
    ///
    /// ```text
    ///  .X.
    ///  XXX
    ///  .X.
    /// ```
    Cross,
    /// Four cells in a row plus one below the second.
    ///
    /// ```text
    ///  XXXX
    ///  .X..
    /// ```
    Plus,
}

impl ShipKind {
    /// Number of cells the shape occupies.
    pub const fn len(self) -> usize {
        match self {
            ShipKind::Single => 1,
            ShipKind::Double => 2,
            ShipKind::Triple => 3,
            ShipKind::Cross | ShipKind::Plus => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShipKind::Single => "Single",
            ShipKind::Double => "Double",
            ShipKind::Triple => "Triple",
            ShipKind::Cross => "Cross",
            ShipKind::Plus => "Plus",
        }
    }

    /// Cell offsets `(dx, dy)` from the top-left of the shape's bounding box.
    pub fn offsets(self, orientation: Orientation) -> &'static [(usize, usize)] {
        use Orientation::*;
        match (self, orientation) {
            (ShipKind::Single, _) => &[(0, 0)],
            (ShipKind::Double, Horizontal) => &[(0, 0), (1, 0)],
            (ShipKind::Double, Vertical) => &[(0, 0), (0, 1)],
            (ShipKind::Triple, Horizontal) => &[(0, 0), (1, 0), (2, 0)],
            (ShipKind::Triple, Vertical) => &[(0, 0), (0, 1), (0, 2)],
            (ShipKind::Cross, _) => &[(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)],
            (ShipKind::Plus, _) => &[(0, 0), (1, 0), (2, 0), (3, 0), (1, 1)],
        }
    }

    /// Draw one random candidate cell set for a board of side `size`.
    ///
    /// Straight ships pick any anchor and a random orientation, and return
    /// `None` when the shape would run off the board. `Cross` and `Plus`
    /// restrict the anchor so the whole shape always fits.
    pub fn candidate<R: Rng + ?Sized>(
        self,
        size: usize,
        rng: &mut R,
    ) -> Option<Vec<(usize, usize)>> {
        if size == 0 {
            return None;
        }
        match self {
            ShipKind::Single | ShipKind::Double | ShipKind::Triple => {
                let x = rng.random_range(0..size);
                let y = rng.random_range(0..size);
                let orientation = if rng.random() {
                    Orientation::Horizontal
                } else {
                    Orientation::Vertical
                };
                let cells: Vec<_> = self
                    .offsets(orientation)
                    .iter()
                    .map(|&(dx, dy)| (x + dx, y + dy))
                    .collect();
                if cells.iter().all(|&(cx, cy)| cx < size && cy < size) {
                    Some(cells)
                } else {
                    None
                }
            }
            ShipKind::Cross | ShipKind::Plus => {
                let offsets = self.offsets(Orientation::Horizontal);
                let (width, height) = extent(offsets);
                if width > size || height > size {
                    return None;
                }
                let x = rng.random_range(0..=size - width);
                let y = rng.random_range(0..=size - height);
                Some(offsets.iter().map(|&(dx, dy)| (x + dx, y + dy)).collect())
            }
        }
    }
}

impl fmt::Display for ShipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn extent(offsets: &[(usize, usize)]) -> (usize, usize) {
    offsets.iter().fold((0, 0), |(w, h), &(dx, dy)| {
        (w.max(dx + 1), h.max(dy + 1))
    })
}

/// Index of a ship within its board's fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShipId(pub usize);

/// A ship placed on a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ship {
    id: ShipId,
    kind: ShipKind,
    cells: Vec<(usize, usize)>,
    hits: usize,
}

impl Ship {
    pub(crate) fn new(id: ShipId, kind: ShipKind, cells: Vec<(usize, usize)>) -> Self {
        Self {
            id,
            kind,
            cells,
            hits: 0,
        }
    }

    pub fn id(&self) -> ShipId {
        self.id
    }

    pub fn kind(&self) -> ShipKind {
        self.kind
    }

    /// Occupied `(x, y)` coordinates, in shape order.
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    pub fn hit_count(&self) -> usize {
        self.hits
    }

    /// Check if the ship is sunk (all segments hit).
    pub fn is_sunk(&self) -> bool {
        self.hit_count() == self.cells.len()
    }

    /// Count one more hit. Returns `true` if this hit sank the ship.
    pub(crate) fn register_hit(&mut self) -> bool {
        if self.is_sunk() {
            return false;
        }
        self.hits += 1;
        self.is_sunk()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn offsets_match_length() {
        for kind in [
            ShipKind::Single,
            ShipKind::Double,
            ShipKind::Triple,
            ShipKind::Cross,
            ShipKind::Plus,
        ] {
            for o in [Orientation::Horizontal, Orientation::Vertical] {
                assert_eq!(kind.offsets(o).len(), kind.len(), "{kind} {o:?}");
            }
        }
    }

    #[test]
    fn cross_and_plus_always_fit() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..500 {
            for kind in [ShipKind::Cross, ShipKind::Plus] {
                let cells = kind.candidate(10, &mut rng).unwrap();
                assert!(cells.iter().all(|&(x, y)| x < 10 && y < 10));
            }
        }
    }

    #[test]
    fn cross_center_stays_off_the_edge() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..500 {
            let cells = ShipKind::Cross.candidate(10, &mut rng).unwrap();
            let (cx, cy) = cells[2];
            assert!((1..=8).contains(&cx));
            assert!((1..=8).contains(&cy));
        }
    }

    #[test]
    fn straight_candidates_never_leave_the_board() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut rejected = 0;
        for _ in 0..2000 {
            match ShipKind::Triple.candidate(10, &mut rng) {
                Some(cells) => assert!(cells.iter().all(|&(x, y)| x < 10 && y < 10)),
                None => rejected += 1,
            }
        }
        assert!(rejected > 0, "anchors near the edge should be rejected");
    }

    #[test]
    fn register_hit_sinks_after_every_cell() {
        let mut ship = Ship::new(ShipId(0), ShipKind::Double, vec![(0, 0), (1, 0)]);
        assert!(!ship.register_hit());
        assert!(!ship.is_sunk());
        assert!(ship.register_hit());
        assert!(ship.is_sunk());
        assert!(!ship.register_hit());
        assert_eq!(ship.hit_count(), 2);
    }
}

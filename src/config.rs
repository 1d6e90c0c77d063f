use std::time::Duration;

use crate::ship::ShipKind;

pub const MIN_BOARD_SIZE: usize = 10;
pub const MAX_BOARD_SIZE: usize = 20;
pub const DEFAULT_BOARD_SIZE: usize = 10;

/// Random candidates drawn per ship before placement gives up.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1000;

pub const NUM_SHIPS: usize = 7;

/// Fleet composition in placement order. Larger shapes go first so they
/// still find room on a 10x10 board.
pub const FLEET: [ShipKind; NUM_SHIPS] = [
    ShipKind::Plus,
    ShipKind::Cross,
    ShipKind::Triple,
    ShipKind::Double,
    ShipKind::Double,
    ShipKind::Single,
    ShipKind::Single,
];

/// Total number of ship segments in a full fleet.
pub const FLEET_CELLS: usize = 5 + 5 + 3 + 2 + 2 + 1 + 1;

pub const PROTOCOL_VERSION: u8 = 1;

const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);
const DEFAULT_REAP_INTERVAL: Duration = Duration::from_secs(60);

/// Clamp a requested board size into the supported range. Out-of-range
/// sizes are never rejected.
pub fn clamp_board_size(requested: i32) -> usize {
    requested.clamp(MIN_BOARD_SIZE as i32, MAX_BOARD_SIZE as i32) as usize
}

/// Runtime settings for a [`SessionRegistry`](crate::SessionRegistry).
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Fixed seed for reproducible fleets. `None` seeds from the thread RNG.
    pub seed: Option<u64>,
    /// Idle time after which a session is evicted by the reaper.
    pub session_ttl: Duration,
    /// How often the server runs the reaper.
    pub reap_interval: Duration,
}

impl RegistryConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            seed: None,
            session_ttl: DEFAULT_SESSION_TTL,
            reap_interval: DEFAULT_REAP_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fleet_cells_match_composition() {
        let total: usize = FLEET.iter().map(|k| k.len()).sum();
        assert_eq!(total, FLEET_CELLS);
    }

    #[test]
    fn board_size_is_clamped() {
        assert_eq!(clamp_board_size(5), 10);
        assert_eq!(clamp_board_size(-3), 10);
        assert_eq!(clamp_board_size(15), 15);
        assert_eq!(clamp_board_size(25), 20);
    }
}

//! Concurrent store of live sessions.
//!
//! The map of sessions sits behind an `RwLock` and every session behind its
//! own `Mutex`. An operation on a session holds that session's lock for its
//! whole duration, so a turn check and the shot that follows can never
//! interleave with another shot. Locks are always taken map first, session
//! second.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::{clamp_board_size, RegistryConfig};
use crate::domain::{
    AvailableGame, CreateGameResponse, CreateLocalGameResponse, GameId, GameStatusResponse,
    JoinGameResponse, LocalGameStatusResponse, PlayerId, ShotResponse,
};
use crate::error::GameError;
use crate::session::{GameSession, Player, SessionState, Shooter};

const DEFAULT_JOIN_NAME: &str = "Player 2";

type SharedSession = Arc<Mutex<GameSession>>;

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<GameId, SharedSession>>,
    config: RegistryConfig,
    placements: AtomicU64,
}

impl SessionRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
            placements: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Create a networked game and seat its first player.
    pub fn create_game(&self, board_size: i32) -> Result<CreateGameResponse, GameError> {
        let board_size = clamp_board_size(board_size);
        let player = self.new_player("Player 1", board_size)?;
        let player_id = player.id();
        let session = GameSession::networked(player);
        let game_id = self.insert(session);
        info!("created game {game_id} ({board_size}x{board_size})");
        Ok(CreateGameResponse {
            game_id,
            player_id,
            board_size,
        })
    }

    /// Seat a second player in a waiting game. A blank name falls back to
    /// "Player 2".
    pub fn join_game(
        &self,
        game_id: GameId,
        player_name: &str,
    ) -> Result<JoinGameResponse, GameError> {
        let session = self.get(game_id)?;
        let mut session = lock_live(&session)?;
        if session.is_full() {
            warn!("join rejected, game {game_id} is full");
            return Err(GameError::GameAlreadyFull);
        }
        let name = match player_name.trim() {
            "" => DEFAULT_JOIN_NAME,
            name => name,
        };
        let player = self.new_player(name, session.board_size())?;
        let player_id = player.id();
        session.join(player)?;
        Ok(JoinGameResponse {
            game_id,
            player_id,
            game_started: true,
        })
    }

    /// Shot by the caller identified as `player_id`.
    pub fn shoot(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        x: i32,
        y: i32,
    ) -> Result<ShotResponse, GameError> {
        let session = self.get(game_id)?;
        let result = lock_live(&session)?.fire(Shooter::Identity(player_id), x, y);
        if let Err(e) = &result {
            debug!("shot by {player_id} in game {game_id} rejected: {e}");
        }
        result
    }

    pub fn game_status(
        &self,
        game_id: GameId,
        player_id: PlayerId,
    ) -> Result<GameStatusResponse, GameError> {
        let session = self.get(game_id)?;
        let mut session = lock_live(&session)?;
        let status = session.status_for(player_id)?;
        session.touch();
        Ok(status)
    }

    /// Networked games still waiting for a second player, oldest first.
    pub fn available_games(&self) -> Vec<AvailableGame> {
        let sessions: Vec<SharedSession> = self.read().values().cloned().collect();
        let mut games: Vec<AvailableGame> = sessions
            .iter()
            .filter_map(|s| {
                let s = lock(s);
                (!s.is_evicted() && s.state() == SessionState::WaitingForPlayer).then(|| AvailableGame {
                    game_id: s.id(),
                    board_size: s.board_size(),
                    created_at: s.created_at(),
                })
            })
            .collect();
        games.sort_by_key(|g| g.created_at);
        games
    }

    /// Create a hot-seat game with both players seated.
    pub fn create_local_game(&self, board_size: i32) -> Result<CreateLocalGameResponse, GameError> {
        let board_size = clamp_board_size(board_size);
        let player1 = self.new_player("Player 1", board_size)?;
        let player2 = self.new_player("Player 2", board_size)?;
        let (player1_id, player2_id) = (player1.id(), player2.id());
        let session = GameSession::local(player1, player2);
        let game_id = self.insert(session);
        info!("created local game {game_id} ({board_size}x{board_size})");
        Ok(CreateLocalGameResponse {
            game_id,
            player1_id,
            player2_id,
            board_size,
            current_player_id: player1_id,
        })
    }

    pub fn local_game_status(&self, game_id: GameId) -> Result<LocalGameStatusResponse, GameError> {
        let session = self.get(game_id)?;
        let mut session = lock_live(&session)?;
        let status = session.local_status()?;
        session.touch();
        Ok(status)
    }

    /// Shot by whoever holds the turn in a local game.
    pub fn local_shot(&self, game_id: GameId, x: i32, y: i32) -> Result<ShotResponse, GameError> {
        let session = self.get(game_id)?;
        let result = lock_live(&session)?.fire(Shooter::CurrentTurn, x, y);
        if let Err(e) = &result {
            debug!("local shot in game {game_id} rejected: {e}");
        }
        result
    }

    /// Evict every session idle for at least `ttl`. Returns how many were
    /// removed.
    pub fn reap(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|id, session| {
            let mut session = lock(session);
            let keep = session.idle_for(now) < ttl;
            if !keep {
                debug!("evicting {:?} game {id}", session.state());
                session.evict();
            }
            keep
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("reaped {evicted} idle game(s), {} remaining", sessions.len());
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn new_player(&self, name: &str, board_size: usize) -> Result<Player, GameError> {
        let mut rng = self.placement_rng();
        Player::new(name, board_size, &mut rng)
    }

    /// Each placement gets its own generator. A configured seed makes the
    /// sequence of fleets reproducible.
    fn placement_rng(&self) -> SmallRng {
        match self.config.seed {
            Some(seed) => {
                let n = self.placements.fetch_add(1, Ordering::Relaxed);
                SmallRng::seed_from_u64(seed.wrapping_add(n))
            }
            None => SmallRng::from_rng(&mut rand::rng()),
        }
    }

    fn insert(&self, session: GameSession) -> GameId {
        let id = session.id();
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(Mutex::new(session)));
        id
    }

    fn get(&self, id: GameId) -> Result<SharedSession, GameError> {
        self.read().get(&id).cloned().ok_or(GameError::GameNotFound)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<GameId, SharedSession>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Every session mutation either completes or returns before touching
/// state, so a poisoned lock still guards a consistent session.
fn lock(session: &Mutex<GameSession>) -> MutexGuard<'_, GameSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Lock a session fetched from the map, failing if `reap` removed it in
/// the meantime.
fn lock_live(session: &Mutex<GameSession>) -> Result<MutexGuard<'_, GameSession>, GameError> {
    let session = lock(session);
    if session.is_evicted() {
        return Err(GameError::GameNotFound);
    }
    Ok(session)
}

//! Per-game state machine: seats, turn pointer, and shot handling.

use std::time::{Duration, Instant, SystemTime};

use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::{Board, ShotOutcome};
use crate::domain::{
    GameId, GameStatusResponse, LocalGameStatusResponse, PlayerId, ShotResponse,
};
use crate::error::GameError;

/// Lifecycle of a session. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    WaitingForPlayer,
    InProgress,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Two remote players, each identified by their player id.
    Networked,
    /// Both seats on one machine; whoever holds the turn shoots.
    Local,
}

/// How the shooter of a shot is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shooter {
    /// The caller claims this identity and must hold the turn.
    Identity(PlayerId),
    /// Whoever holds the turn. Local sessions only.
    CurrentTurn,
}

#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    name: String,
    board: Board,
}

impl Player {
    /// Create a player whose board already carries a full fleet.
    pub fn new<R: Rng + ?Sized>(
        name: impl Into<String>,
        board_size: usize,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        Ok(Self::with_board(name, Board::with_fleet(board_size, rng)?))
    }

    pub(crate) fn with_board(name: impl Into<String>, board: Board) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            board,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn board(&self) -> &Board {
        &self.board
    }
}

#[derive(Debug)]
pub struct GameSession {
    id: GameId,
    mode: Mode,
    state: SessionState,
    player1: Player,
    player2: Option<Player>,
    current: Option<PlayerId>,
    winner: Option<PlayerId>,
    board_size: usize,
    created_at: SystemTime,
    last_activity: Instant,
    evicted: bool,
}

impl GameSession {
    /// Networked session waiting for a second player.
    pub fn networked(player1: Player) -> Self {
        Self::build(Mode::Networked, SessionState::WaitingForPlayer, player1, None)
    }

    /// Local session with both seats filled; player one moves first.
    pub fn local(player1: Player, player2: Player) -> Self {
        let mut session = Self::build(Mode::Local, SessionState::InProgress, player1, Some(player2));
        session.current = Some(session.player1.id);
        session
    }

    fn build(mode: Mode, state: SessionState, player1: Player, player2: Option<Player>) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            state,
            board_size: player1.board.size(),
            player1,
            player2,
            current: None,
            winner: None,
            created_at: SystemTime::now(),
            last_activity: Instant::now(),
            evicted: false,
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn board_size(&self) -> usize {
        self.board_size
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    pub fn current_player(&self) -> Option<PlayerId> {
        self.current
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn player1(&self) -> &Player {
        &self.player1
    }

    pub fn player2(&self) -> Option<&Player> {
        self.player2.as_ref()
    }

    pub fn is_full(&self) -> bool {
        self.player2.is_some()
    }

    /// Seat the second player and start the game.
    pub fn join(&mut self, player2: Player) -> Result<(), GameError> {
        if self.is_full() {
            return Err(GameError::GameAlreadyFull);
        }
        self.current = Some(self.player1.id);
        self.player2 = Some(player2);
        self.state = SessionState::InProgress;
        self.touch();
        info!("game {} started", self.id);
        Ok(())
    }

    /// Resolve one shot against the shooter's opponent.
    ///
    /// The shooter keeps the turn after a hit or sink and passes it on
    /// after water. Sinking the last ship finishes the game.
    pub fn fire(&mut self, shooter: Shooter, x: i32, y: i32) -> Result<ShotResponse, GameError> {
        if shooter == Shooter::CurrentTurn && self.mode != Mode::Local {
            return Err(GameError::NotALocalGame);
        }
        if self.state != SessionState::InProgress {
            return Err(GameError::NotInProgress);
        }
        let current = self.current.ok_or(GameError::NotInProgress)?;
        let shooter_id = match shooter {
            Shooter::CurrentTurn => current,
            Shooter::Identity(id) if id == current => id,
            Shooter::Identity(id) if self.seat(id).is_some() => {
                return Err(GameError::NotYourTurn)
            }
            Shooter::Identity(_) => return Err(GameError::UnknownPlayer),
        };

        let target = self
            .opponent_mut(shooter_id)
            .ok_or(GameError::UnknownPlayer)?;
        let outcome = target.board.fire(x, y)?;
        let target_id = target.id;
        let game_over = target.board.fleet_destroyed();

        if game_over {
            self.state = SessionState::Finished;
            self.winner = Some(shooter_id);
            info!("game {} finished, winner {shooter_id}", self.id);
        } else if outcome == ShotOutcome::Water {
            self.current = Some(target_id);
        }
        self.touch();

        Ok(ShotResponse {
            result: outcome.into(),
            game_over,
            winner_id: self.winner,
            ship_type_sunk: outcome.sunk_kind().map(|k| k.name().to_string()),
        })
    }

    /// Status as seen by `player`: own board with ships, opponent board
    /// with hits and misses only.
    pub fn status_for(&self, player: PlayerId) -> Result<GameStatusResponse, GameError> {
        let (own, enemy) = match self.seat(player) {
            Some(Seat::One) => (&self.player1, self.player2.as_ref()),
            Some(Seat::Two) => match &self.player2 {
                Some(p2) => (p2, Some(&self.player1)),
                None => return Err(GameError::PlayerNotInGame),
            },
            None => return Err(GameError::PlayerNotInGame),
        };
        Ok(GameStatusResponse {
            game_id: self.id,
            state: self.state,
            current_player_id: self.current,
            winner_id: self.winner,
            board_size: self.board_size,
            is_your_turn: self.current == Some(own.id),
            your_board: own.board.view(true),
            enemy_board: enemy.map(|p| p.board.view(false)),
        })
    }

    /// Status from the point of view of whoever holds the turn.
    pub fn local_status(&self) -> Result<LocalGameStatusResponse, GameError> {
        if self.mode != Mode::Local {
            return Err(GameError::NotALocalGame);
        }
        let current = self.current.ok_or(GameError::NotInProgress)?;
        let (me, opponent) = match (self.seat(current), &self.player2) {
            (Some(Seat::One), Some(p2)) => (&self.player1, p2),
            (Some(Seat::Two), Some(p2)) => (p2, &self.player1),
            _ => return Err(GameError::NotInProgress),
        };
        Ok(LocalGameStatusResponse {
            game_id: self.id,
            state: self.state,
            current_player_id: current,
            winner_id: self.winner,
            board_size: self.board_size,
            current_player_name: me.name.clone(),
            current_player_board: me.board.view(true),
            opponent_board: opponent.board.view(false),
        })
    }

    pub(crate) fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Mark the session as removed from its registry. Callers that
    /// obtained it before removal must treat it as gone.
    pub(crate) fn evict(&mut self) {
        self.evicted = true;
    }

    pub(crate) fn is_evicted(&self) -> bool {
        self.evicted
    }

    /// Time since the last successful operation, measured against `now`.
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }

    fn seat(&self, player: PlayerId) -> Option<Seat> {
        if self.player1.id == player {
            Some(Seat::One)
        } else if self.player2.as_ref().is_some_and(|p| p.id == player) {
            Some(Seat::Two)
        } else {
            None
        }
    }

    fn opponent_mut(&mut self, player: PlayerId) -> Option<&mut Player> {
        match self.seat(player)? {
            Seat::One => self.player2.as_mut(),
            Seat::Two => Some(&mut self.player1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seat {
    One,
    Two,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShotResult;
    use crate::ship::ShipKind;

    /// Player whose board holds one Single at (0, 0) and one Double at
    /// (5, 5)-(6, 5).
    fn small_fleet(name: &str) -> Player {
        let mut board = Board::new(10).unwrap();
        board.place(ShipKind::Single, &[(0, 0)]).unwrap();
        board.place(ShipKind::Double, &[(5, 5), (6, 5)]).unwrap();
        Player::with_board(name, board)
    }

    fn started() -> (GameSession, PlayerId, PlayerId) {
        let p1 = small_fleet("Player 1");
        let p2 = small_fleet("Player 2");
        let (id1, id2) = (p1.id(), p2.id());
        let mut session = GameSession::networked(p1);
        session.join(p2).unwrap();
        (session, id1, id2)
    }

    #[test]
    fn waiting_session_rejects_shots() {
        let mut session = GameSession::networked(small_fleet("Player 1"));
        let p1 = session.player1().id();
        assert_eq!(session.state(), SessionState::WaitingForPlayer);
        assert_eq!(
            session.fire(Shooter::Identity(p1), 0, 0).unwrap_err(),
            GameError::NotInProgress
        );
    }

    #[test]
    fn join_starts_game_with_player_one() {
        let (mut session, id1, _) = started();
        assert_eq!(session.state(), SessionState::InProgress);
        assert_eq!(session.current_player(), Some(id1));
        assert_eq!(
            session.join(small_fleet("late")).unwrap_err(),
            GameError::GameAlreadyFull
        );
    }

    #[test]
    fn water_passes_the_turn() {
        let (mut session, id1, id2) = started();
        let res = session.fire(Shooter::Identity(id1), 9, 9).unwrap();
        assert_eq!(res.result, ShotResult::Water);
        assert_eq!(session.current_player(), Some(id2));
        assert_eq!(
            session.fire(Shooter::Identity(id1), 8, 8).unwrap_err(),
            GameError::NotYourTurn
        );
    }

    #[test]
    fn hit_keeps_the_turn() {
        let (mut session, id1, _) = started();
        let res = session.fire(Shooter::Identity(id1), 5, 5).unwrap();
        assert_eq!(res.result, ShotResult::Hit);
        assert_eq!(session.current_player(), Some(id1));
        let res = session.fire(Shooter::Identity(id1), 0, 0).unwrap();
        assert_eq!(res.result, ShotResult::Sunk);
        assert_eq!(res.ship_type_sunk.as_deref(), Some("Single"));
        assert!(!res.game_over);
        assert_eq!(session.current_player(), Some(id1));
    }

    #[test]
    fn sinking_last_ship_finishes() {
        let (mut session, id1, _) = started();
        for (x, y) in [(0, 0), (5, 5)] {
            let res = session.fire(Shooter::Identity(id1), x, y).unwrap();
            assert!(!res.game_over);
            assert_eq!(res.winner_id, None);
        }
        let res = session.fire(Shooter::Identity(id1), 6, 5).unwrap();
        assert!(res.game_over);
        assert_eq!(res.winner_id, Some(id1));
        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(session.winner(), Some(id1));
        assert_eq!(
            session.fire(Shooter::Identity(id1), 9, 9).unwrap_err(),
            GameError::NotInProgress
        );
    }

    #[test]
    fn strangers_are_unknown() {
        let (mut session, _, _) = started();
        assert_eq!(
            session
                .fire(Shooter::Identity(Uuid::new_v4()), 0, 0)
                .unwrap_err(),
            GameError::UnknownPlayer
        );
        assert_eq!(
            session.status_for(Uuid::new_v4()).unwrap_err(),
            GameError::PlayerNotInGame
        );
    }

    #[test]
    fn failed_shot_keeps_turn_and_board() {
        let (mut session, id1, _) = started();
        assert!(session.fire(Shooter::Identity(id1), 10, 0).is_err());
        assert_eq!(session.current_player(), Some(id1));
        session.fire(Shooter::Identity(id1), 5, 5).unwrap();
        assert_eq!(
            session.fire(Shooter::Identity(id1), 5, 5).unwrap_err(),
            GameError::CellAlreadyTargeted { x: 5, y: 5 }
        );
        assert_eq!(session.current_player(), Some(id1));
    }

    #[test]
    fn networked_session_refuses_local_shots() {
        let (mut session, _, _) = started();
        assert_eq!(
            session.fire(Shooter::CurrentTurn, 0, 0).unwrap_err(),
            GameError::NotALocalGame
        );
        assert_eq!(session.local_status().unwrap_err(), GameError::NotALocalGame);
    }

    #[test]
    fn local_status_follows_the_turn() {
        let mut session = GameSession::local(small_fleet("Player 1"), small_fleet("Player 2"));
        let status = session.local_status().unwrap();
        assert_eq!(status.current_player_name, "Player 1");
        session.fire(Shooter::CurrentTurn, 9, 9).unwrap();
        let status = session.local_status().unwrap();
        assert_eq!(status.current_player_name, "Player 2");
        assert!(status.current_player_board.cell(0, 0).unwrap().is_ship);
        assert!(status.opponent_board.cells.iter().all(|c| !c.is_ship));
    }

    #[test]
    fn status_before_join_has_no_enemy_board() {
        let session = GameSession::networked(small_fleet("Player 1"));
        let status = session.status_for(session.player1().id()).unwrap();
        assert!(status.enemy_board.is_none());
        assert!(!status.is_your_turn);
        assert_eq!(status.current_player_id, None);
    }
}

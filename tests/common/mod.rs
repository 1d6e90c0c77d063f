//! Scenarios shared by the in-process, in-memory and TCP test suites.

#![allow(dead_code)]

use battleships::{GameApi, GameError, SessionState, ShotResult};

/// Expect `res` to be a rejection carrying `expected`.
pub fn assert_rejected<T: std::fmt::Debug>(res: anyhow::Result<T>, expected: GameError) {
    let err = res.expect_err("request should have been rejected");
    assert_eq!(err.downcast_ref::<GameError>(), Some(&expected), "{err}");
}

/// Create, list, join and fire the first shot of a networked game. `api`
/// must not have seen any other games.
pub async fn networked_scenario<A: GameApi>(api: &A) -> anyhow::Result<()> {
    let created = api.create_game(10).await?;
    assert_eq!(created.board_size, 10);
    assert!(!created.game_id.is_nil());
    assert!(!created.player_id.is_nil());

    let available = api.available_games().await?;
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].game_id, created.game_id);
    assert_eq!(available[0].board_size, 10);

    let status = api.game_status(created.game_id, created.player_id).await?;
    assert_eq!(status.state, SessionState::WaitingForPlayer);
    assert!(status.enemy_board.is_none());
    assert_rejected(
        api.shoot(created.game_id, created.player_id, 0, 0).await,
        GameError::NotInProgress,
    );

    let joined = api.join_game(created.game_id, "P2").await?;
    assert!(joined.game_started);
    assert_eq!(joined.game_id, created.game_id);
    assert_ne!(joined.player_id, created.player_id);
    assert!(api.available_games().await?.is_empty());
    assert_rejected(
        api.join_game(created.game_id, "P3").await,
        GameError::GameAlreadyFull,
    );

    assert_rejected(
        api.shoot(created.game_id, joined.player_id, 0, 0).await,
        GameError::NotYourTurn,
    );
    let shot = api.shoot(created.game_id, created.player_id, 0, 0).await?;
    let status = api.game_status(created.game_id, created.player_id).await?;
    assert_eq!(status.state, SessionState::InProgress);
    if shot.result == ShotResult::Water {
        assert!(!status.is_your_turn);
        assert_eq!(status.current_player_id, Some(joined.player_id));
    } else {
        assert!(status.is_your_turn);
        assert_eq!(status.current_player_id, Some(created.player_id));
    }

    let enemy = status.enemy_board.expect("joined game shows the enemy board");
    let target = enemy.cell(0, 0).expect("in bounds");
    assert!(target.is_hit || target.is_miss);
    assert!(enemy.cells.iter().all(|c| !c.is_ship));
    assert_eq!(
        status.your_board.cells.iter().filter(|c| c.is_ship).count(),
        battleships::FLEET_CELLS
    );

    let theirs = api.game_status(created.game_id, joined.player_id).await?;
    assert_eq!(theirs.is_your_turn, shot.result == ShotResult::Water);
    let their_own = theirs.your_board.cell(0, 0).expect("in bounds");
    assert_eq!(their_own.is_hit, shot.result != ShotResult::Water);
    Ok(())
}

/// Create a hot-seat game and keep firing until the first miss hands the
/// turn to player two.
pub async fn local_scenario<A: GameApi>(api: &A) -> anyhow::Result<()> {
    let created = api.create_local_game(10).await?;
    assert_eq!(created.current_player_id, created.player1_id);
    assert!(api.available_games().await?.is_empty());

    let status = api.local_game_status(created.game_id).await?;
    assert_eq!(status.current_player_name, "Player 1");
    assert_eq!(status.state, SessionState::InProgress);

    let mut missed = false;
    'sweep: for y in 0..10 {
        for x in 0..10 {
            let res = api.local_shot(created.game_id, x, y).await?;
            let status = api.local_game_status(created.game_id).await?;
            if res.result == ShotResult::Water {
                assert_eq!(status.current_player_name, "Player 2");
                assert_eq!(status.current_player_id, created.player2_id);
                missed = true;
                break 'sweep;
            }
            assert_eq!(status.current_player_name, "Player 1");
        }
    }
    assert!(missed, "19 ship cells cannot fill a 10x10 board");

    let networked = api.create_game(10).await?;
    assert_rejected(
        api.local_game_status(networked.game_id).await,
        GameError::NotALocalGame,
    );
    assert_rejected(
        api.local_shot(networked.game_id, 0, 0).await,
        GameError::NotALocalGame,
    );
    Ok(())
}

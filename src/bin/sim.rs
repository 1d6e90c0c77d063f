//! Plays one local game with random shots and prints the outcome as JSON.

use battleships::{RegistryConfig, SessionRegistry, ShotResult};
use rand::seq::SliceRandom;
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <seed> [board_size]", args[0]);
        std::process::exit(1);
    }
    let seed: u64 = args[1].parse()?;
    let size: i32 = match args.get(2) {
        Some(s) => s.parse()?,
        None => 10,
    };

    let registry = SessionRegistry::new(RegistryConfig::seeded(seed));
    let game = registry.create_local_game(size)?;
    let board_size = game.board_size as i32;

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut targets: [Vec<(i32, i32)>; 2] = Default::default();
    for seat in targets.iter_mut() {
        *seat = (0..board_size)
            .flat_map(|y| (0..board_size).map(move |x| (x, y)))
            .collect();
        seat.shuffle(&mut rng);
    }

    let mut shots = [0usize; 2];
    let mut hits = [0usize; 2];
    let winner = loop {
        let status = registry.local_game_status(game.game_id)?;
        let seat = usize::from(status.current_player_id != game.player1_id);
        let (x, y) = targets[seat]
            .pop()
            .ok_or_else(|| anyhow::anyhow!("player {} ran out of targets", seat + 1))?;
        let res = registry.local_shot(game.game_id, x, y)?;
        shots[seat] += 1;
        if res.result != ShotResult::Water {
            hits[seat] += 1;
        }
        if res.game_over {
            break seat;
        }
    };

    let result = json!({
        "boardSize": game.board_size,
        "player1": {"shots": shots[0], "hits": hits[0]},
        "player2": {"shots": shots[1], "hits": hits[1]},
        "winner": if winner == 0 { "player1" } else { "player2" },
    });
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}

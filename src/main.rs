use std::io::{self, BufRead, Write};
use std::sync::Arc;

use battleships::ui::{parse_coord, render_board};
use battleships::{
    init_logging, serve, spawn_reaper, GameApi, GameId, RegistryConfig, SessionRegistry,
    SessionState, ShotResponse, ShotResult, Stub, TcpTransport, DEFAULT_BOARD_SIZE,
};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use tokio::net::TcpListener;
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (error, warn, info, debug, trace). Overrides BATTLESHIP_LOG.
    #[arg(long, global = true)]
    log_level: Option<LevelFilter>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the game server.
    Serve {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
        #[arg(long, help = "Fix RNG seed for reproducible fleets (e.g., --seed 12345)")]
        seed: Option<u64>,
        /// Seconds a game may sit idle before it is evicted.
        #[arg(long, default_value_t = 30 * 60)]
        session_ttl_secs: u64,
        /// Seconds between eviction sweeps.
        #[arg(long, default_value_t = 60)]
        reap_interval_secs: u64,
    },
    /// Play a hot-seat game on this terminal.
    Local {
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE as i32)]
        size: i32,
        #[arg(long, help = "Fix RNG seed for reproducible fleets (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Play against someone else through a server.
    Play {
        #[arg(long, default_value = "127.0.0.1:8080")]
        connect: String,
        /// Join this game instead of creating a new one.
        #[arg(long)]
        game: Option<GameId>,
        #[arg(long, default_value = "Player 2")]
        name: String,
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE as i32)]
        size: i32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match cli.command {
        Commands::Serve {
            bind,
            seed,
            session_ttl_secs,
            reap_interval_secs,
        } => {
            let config = RegistryConfig {
                seed,
                session_ttl: Duration::from_secs(session_ttl_secs),
                reap_interval: Duration::from_secs(reap_interval_secs),
            };
            let registry = Arc::new(SessionRegistry::new(config));
            spawn_reaper(Arc::clone(&registry));
            let listener = TcpListener::bind(&bind).await?;
            serve(listener, registry).await?;
        }
        Commands::Local { size, seed } => {
            let config = RegistryConfig {
                seed,
                ..RegistryConfig::default()
            };
            play_local(&SessionRegistry::new(config), size).await?;
        }
        Commands::Play {
            connect,
            game,
            name,
            size,
        } => {
            let stub = Stub::new(TcpTransport::connect(&connect).await?);
            println!("Connected to {}", connect);
            play_remote(&stub, game, &name, size).await?;
        }
    }
    Ok(())
}

/// Prompt until the player enters a coordinate on the board.
fn read_coord(size: usize) -> anyhow::Result<(i32, i32)> {
    let stdin = io::stdin();
    loop {
        print!("Target (e.g. A5): ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err(anyhow::anyhow!("input closed"));
        }
        match parse_coord(&line, size) {
            Ok(coord) => return Ok(coord),
            Err(e) => println!("{}", e),
        }
    }
}

fn report(res: &ShotResponse) {
    match (res.result, &res.ship_type_sunk) {
        (ShotResult::Sunk, Some(kind)) => println!("Sunk a {}!", kind),
        (ShotResult::Sunk, None) | (ShotResult::Hit, _) => println!("Hit!"),
        (ShotResult::Water, _) => println!("Water."),
    }
}

async fn play_local(api: &impl GameApi, size: i32) -> anyhow::Result<()> {
    let game = api.create_local_game(size).await?;
    loop {
        let status = api.local_game_status(game.game_id).await?;
        if status.state == SessionState::Finished {
            let winner = if status.winner_id == Some(game.player1_id) {
                "Player 1"
            } else {
                "Player 2"
            };
            println!("\nGAME OVER - {} wins!", winner);
            println!("{}", render_board(&status.opponent_board));
            return Ok(());
        }
        println!("\n=== {} ===", status.current_player_name);
        println!("Your fleet:\n{}", render_board(&status.current_player_board));
        println!("Enemy waters:\n{}", render_board(&status.opponent_board));
        let (x, y) = read_coord(status.board_size)?;
        match api.local_shot(game.game_id, x, y).await {
            Ok(res) => report(&res),
            Err(e) => println!("{}", e),
        }
    }
}

async fn play_remote(
    api: &impl GameApi,
    game: Option<GameId>,
    name: &str,
    size: i32,
) -> anyhow::Result<()> {
    let (game_id, player_id) = match game {
        Some(game_id) => {
            let joined = api.join_game(game_id, name).await?;
            println!("Joined game {}", game_id);
            (game_id, joined.player_id)
        }
        None => {
            let created = api.create_game(size).await?;
            println!("Created game {} - share this id with your opponent", created.game_id);
            (created.game_id, created.player_id)
        }
    };

    let mut waiting_shown = false;
    loop {
        let status = api.game_status(game_id, player_id).await?;
        match status.state {
            SessionState::Finished => {
                if status.winner_id == Some(player_id) {
                    println!("\nVICTORY! You have sunk the enemy fleet.");
                } else {
                    println!("\nDEFEAT. Your fleet has been destroyed.");
                }
                println!("{}", render_board(&status.your_board));
                return Ok(());
            }
            SessionState::InProgress if status.is_your_turn => {
                waiting_shown = false;
                println!("\n=== YOUR TURN ===");
                println!("Your fleet:\n{}", render_board(&status.your_board));
                if let Some(enemy) = &status.enemy_board {
                    println!("Enemy waters:\n{}", render_board(enemy));
                }
                let (x, y) = read_coord(status.board_size)?;
                match api.shoot(game_id, player_id, x, y).await {
                    Ok(res) => report(&res),
                    Err(e) => println!("{}", e),
                }
            }
            _ => {
                if !waiting_shown {
                    println!("Waiting for opponent...");
                    waiting_shown = true;
                }
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}

//! Plays engines against each other and reports how often each of them wins.
//!
//! Every game goes through the same turn protocol the engine binary uses,
//! including the swap decision on the second turn. Games are independent and
//! run in parallel.

use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use hexen::agent::{Agent, AgentConfig, EngineKind};
use hexen::hex::core::{Colour, Move, BOARD_WIDTH, MAX_BOARD_WIDTH};
use hexen::hex::game::Game;
use hexen::search::Limits;
use rayon::prelude::*;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn engine(name: &str) -> anyhow::Result<EngineKind> {
    EngineKind::try_from(name)
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of games to play.
    #[arg(long, default_value_t = 10)]
    games: u32,
    /// Board width.
    #[arg(long, default_value_t = BOARD_WIDTH,
          value_parser = clap::value_parser!(u8).range(1..=i64::from(MAX_BOARD_WIDTH)))]
    size: u8,
    /// Engine of the player moving first.
    #[arg(long, default_value = "mcts", value_parser = engine)]
    red: EngineKind,
    /// Engine of the player moving second.
    #[arg(long, default_value = "minimax", value_parser = engine)]
    blue: EngineKind,
    /// MCTS time budget per move in milliseconds.
    #[arg(long, default_value_t = 100)]
    movetime: u64,
    /// Minimax search depth.
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..))]
    depth: u8,
    /// Base seed, every game derives its own seeds from it.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

/// Result of a single game. Player 0 is the one who made the first move.
#[derive(Debug)]
struct Outcome {
    winner: usize,
    swapped: bool,
    moves: usize,
}

fn play_game(index: u64, args: &Args) -> anyhow::Result<Outcome> {
    let limits = Limits {
        time: Some(Duration::from_millis(args.movetime)),
        depth: Some(args.depth),
        iterations: None,
    };
    let config = |engine, seed| AgentConfig {
        engine,
        limits,
        seed: Some(seed),
        ..AgentConfig::default()
    };
    // Agents use `seed` and `seed + 1`.
    let seed = args.seed.wrapping_add(index.wrapping_mul(4));
    let mut players = [
        Agent::new(Colour::Red, &config(args.red, seed)),
        Agent::new(Colour::Blue, &config(args.blue, seed.wrapping_add(2))),
    ];

    let mut game = Game::new(args.size);
    while !game.is_over() {
        let current = players
            .iter()
            .position(|agent| agent.colour() == game.to_move())
            .context("no player owns the colour to move")?;
        let next_move = players[current].make_move(game.turn(), game.board(), game.last_move())?;
        debug!(game = index, turn = game.turn(), player = current, %next_move);
        game.make_move(next_move)
            .with_context(|| format!("player {current} sent an illegal move"))?;
        if next_move == Move::Swap {
            players[1 - current].swap_colours();
        }
    }

    let winner = game.winner().context("the board is full but nobody has won")?;
    let winner = players
        .iter()
        .position(|agent| agent.colour() == winner)
        .context("no player owns the winning colour")?;
    info!(game = index, winner, swapped = game.swapped(), "game finished");
    Ok(Outcome {
        winner,
        swapped: game.swapped(),
        moves: game.history().len(),
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    println!(
        "Playing {} games on {}x{}: {} (first) vs {} (second)",
        args.games, args.size, args.size, args.red, args.blue
    );

    let timer = Instant::now();
    let outcomes = (0..u64::from(args.games))
        .into_par_iter()
        .map(|index| play_game(index, &args))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut wins = [0_usize; 2];
    for outcome in &outcomes {
        wins[outcome.winner] += 1;
    }
    let swaps = outcomes.iter().filter(|outcome| outcome.swapped).count();
    let moves = outcomes.iter().map(|outcome| outcome.moves).sum::<usize>();

    println!("{} (first): {} wins", args.red, wins[0]);
    println!("{} (second): {} wins", args.blue, wins[1]);
    println!("Swaps: {swaps}");
    if !outcomes.is_empty() {
        println!("Average game length: {} moves", moves / outcomes.len());
    }
    println!("Finished in {:.1}s", timer.elapsed().as_secs_f64());
    Ok(())
}

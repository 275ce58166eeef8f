//! Gaple - headless runner
//!
//! Plays whole games in virtual time and prints how each one ended.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gaple::{
    DeckRange, GameConfig, GameResult, GreedyPolicy, HeaviestFirstPolicy, MovePolicy, Session,
};
use serde::Serialize;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

/// Virtual time allowed for a single game.
const GAME_LIMIT_MS: u64 = 60 * 60 * 1000;

#[derive(Parser, Debug)]
#[command(name = "gaple")]
#[command(about = "Run four-player domino games headlessly", long_about = None)]
#[command(version)]
struct Cli {
    /// Number of games to play
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Base seed; game N uses seed + N
    #[arg(short, long)]
    seed: Option<u64>,

    /// TOML table configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Who sits in the human seat
    #[arg(long, value_enum, default_value_t = HumanMode::Greedy)]
    human: HumanMode,

    /// Policy for the computer seats
    #[arg(long, value_enum, default_value_t = PolicyKind::Greedy)]
    policy: PolicyKind,

    /// Play with the full 28-tile double-six set
    #[arg(long)]
    double_six: bool,

    /// Print one JSON object per game
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum HumanMode {
    /// Never acts; every turn times out
    Idle,
    /// Plays the first legal tile immediately
    Greedy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyKind {
    Greedy,
    Heaviest,
}

impl PolicyKind {
    fn build(self) -> Box<dyn MovePolicy> {
        match self {
            PolicyKind::Greedy => Box::new(GreedyPolicy),
            PolicyKind::Heaviest => Box::new(HeaviestFirstPolicy),
        }
    }
}

#[derive(Serialize)]
struct GameReport {
    game: u32,
    seed: u64,
    finished: bool,
    winner: Option<u8>,
    blocked: bool,
    scores: [u32; 4],
    turns: u32,
    elapsed_ms: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let base = load_config(&cli)?;

    let mut wins = [0u32; 4];
    for game in 0..cli.games {
        let report = play_one(&cli, base.clone(), game)?;
        if let Some(w) = report.winner {
            wins[usize::from(w)] += 1;
        }
        if cli.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            print_report(&report);
        }
    }

    if cli.games > 1 && !cli.json {
        println!("wins by seat: {wins:?}");
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::default(),
    };
    if cli.double_six {
        config = config.with_deck(DeckRange::double_six());
    }
    config.validate()?;
    Ok(config)
}

#[instrument(skip(cli, config))]
fn play_one(cli: &Cli, config: GameConfig, game: u32) -> Result<GameReport> {
    let config = match cli.seed.or(config.seed) {
        Some(seed) => config.with_seed(seed.wrapping_add(u64::from(game))),
        None => config,
    };

    let mut session = Session::new(config, cli.policy.build())?;
    session.start();
    let seed = session.engine().rng_state().seed;

    let result = match cli.human {
        HumanMode::Idle => session.run_until_ended(GAME_LIMIT_MS),
        HumanMode::Greedy => session.run_with_human(&GreedyPolicy, GAME_LIMIT_MS),
    };
    if result.is_none() {
        warn!(game, seed, "game did not finish within the time limit");
    }

    let state = session.state();
    let mut scores = [0u32; 4];
    for (id, player) in state.players.iter() {
        scores[id.index()] = player.score;
    }
    let report = GameReport {
        game,
        seed,
        finished: result.is_some(),
        winner: result.as_ref().map(|r| r.winner().0),
        blocked: matches!(result, Some(GameResult::Blocked { .. })),
        scores,
        turns: state.turn_number,
        elapsed_ms: session.now_ms(),
    };
    info!(game, seed, winner = ?report.winner, turns = report.turns, "game finished");
    Ok(report)
}

fn print_report(report: &GameReport) {
    match report.winner {
        Some(seat) if report.blocked => println!(
            "game {} (seed {}): blocked after {} turns, Player {} wins on pips {:?}",
            report.game, report.seed, report.turns, seat, report.scores
        ),
        Some(seat) => println!(
            "game {} (seed {}): Player {} dominoed after {} turns",
            report.game, report.seed, seat, report.turns
        ),
        None => println!(
            "game {} (seed {}): unfinished after {} ms",
            report.game, report.seed, report.elapsed_ms
        ),
    }
}

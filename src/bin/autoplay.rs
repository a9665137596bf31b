use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use swap_and_match_engine::{Board, ClassicSession, EngineConfig, GreedyPolicy, MovePolicy, Pos, RandomPolicy};

/// Let a bot play a game on the classic eight by eight board.
#[derive(Parser)]
#[command(name = "autoplay", about = "Play a match-three game with a bot")]
struct Cli {
    /// Move policy: random or greedy
    #[arg(long, default_value = "greedy")]
    policy: String,

    /// Path to TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the tile seed
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many turns even if moves are left
    #[arg(long, default_value_t = 100)]
    turns: usize,

    /// Print the board after every turn
    #[arg(long)]
    show_board: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    let policy_seed = config.seed.map(|seed| seed.wrapping_add(1));
    let mut session = ClassicSession::from_config(config).context("starting a new game")?;
    info!(moves = session.legal_moves().len(), "game started");

    match cli.policy.as_str() {
        "greedy" => play(&mut session, &mut GreedyPolicy, &cli),
        "random" => {
            let rng = match policy_seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                None => ChaCha8Rng::from_entropy(),
            };
            play(&mut session, &mut RandomPolicy::new(rng), &cli)
        }
        other => bail!("unknown policy '{}' (expected 'random' or 'greedy')", other),
    }
}

fn play<P: MovePolicy>(session: &mut ClassicSession, policy: &mut P, cli: &Cli) -> Result<()> {
    if cli.show_board {
        println!("{}", render(session.board()));
    }

    for turn in 1..=cli.turns {
        if session.is_game_over() {
            break;
        }

        let Some(outcome) = session.play_turn(policy)? else {
            info!(turn, "policy passed");
            break;
        };

        info!(turn, points = outcome.points(), score = session.score(), "turn played");
        if cli.show_board {
            println!("{}", render(session.board()));
        }
    }

    info!(score = session.score(), game_over = session.is_game_over(), "game finished");
    println!("final score: {}", session.score());
    Ok(())
}

fn render<const W: usize, const H: usize>(board: &Board<W, H>) -> String {
    let mut output = String::new();

    for row in 0..H {
        for column in 0..W {
            let letter = match board.tile(Pos::new(column, row)) {
                Some(tile) => char::from_u32('A' as u32 + u32::from(tile.0)).unwrap_or('?'),
                None => '.',
            };
            output.push(letter);
        }
        output.push('\n');
    }

    output
}

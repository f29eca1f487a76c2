//! Headless arena runner.
//!
//! Loads content from a data directory, spawns the player and the requested
//! monsters, and plays the encounter out with a fixed player policy (attack
//! the first living monster, spend every level-up on strength).
//!
//! ```text
//! RUST_LOG=crawl=debug cargo run -p crawl-sim -- --seed 7 --enemy orc --enemy goblin
//! ```
mod arena;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use crawl_content::ContentFactory;
use crawl_core::TurnEngine;

use arena::{Arena, ArenaOutcome, Transcript};

/// Run one arena encounter to completion.
#[derive(Parser)]
#[command(name = "crawl-sim")]
#[command(about = "Headless arena runner for the crawl combat core", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding config.toml, items.ron and actors.ron
    #[arg(short, long, value_name = "DIR", default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data"))]
    data_dir: PathBuf,

    /// Game seed; the same seed replays the same encounter
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Actor key of the player
    #[arg(short, long, default_value = "hero")]
    player: String,

    /// Actor key of a monster; repeat for more
    #[arg(short, long = "enemy", value_name = "KEY", default_values = ["orc", "goblin"])]
    enemies: Vec<String>,

    /// Micro-step budget before the run is called a stalemate
    #[arg(long, default_value_t = 10_000)]
    max_steps: usize,

    /// Suppress the message log
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let content = ContentFactory::new(cli.data_dir.clone()).load_all()?;
    let engine = TurnEngine::new(content.config.clone(), cli.seed);
    let mut arena = Arena::new(engine, &content, &cli.player, &cli.enemies)?;

    let mut transcript = Transcript::new(!cli.quiet);
    let report = arena.run(&mut transcript, cli.max_steps)?;

    let verdict = match report.outcome {
        ArenaOutcome::Victory => "victory",
        ArenaOutcome::Defeat => "defeat",
        ArenaOutcome::Stalled => "stalemate",
    };
    println!(
        "{verdict} after {} steps ({} actions)",
        report.steps, report.actions
    );
    Ok(())
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Endless Dungeons session.

mod config;
mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::SimulationConfig;
use crate::session::{Scenario, Session};

/// Runs the dungeon simulation without a window and reports the outcome.
#[derive(Debug, Parser)]
#[command(name = "endless-dungeons", version)]
struct Args {
    /// Map to load.
    #[arg(long, value_enum, default_value_t = Scenario::Corridor)]
    scenario: Scenario,
    /// Overrides the configured tick limit.
    #[arg(long)]
    ticks: Option<u64>,
    /// Overrides the configured drop seed.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file with simulation settings.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Entry point for the Endless Dungeons command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading simulation config from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(ticks) = args.ticks {
        config.ticks = ticks;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut session = Session::new(args.scenario, &config);
    println!("{}", session.banner());

    let summary = session.run(config.ticks);
    info!(
        scenario = ?args.scenario,
        outcome = ?summary.outcome,
        ticks = summary.ticks,
        kills = summary.kills,
        coins = summary.coins,
        potions = summary.potions,
        player_hp = summary.player_hp,
        "session finished"
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

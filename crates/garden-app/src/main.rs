//! Headless garden defense runner.
//!
//! Plays a session with the autoplay strategy, prints the report as JSON on
//! stdout and credits the earned meta gold to the saved profile.
//!
//! ```bash
//! cargo run -p garden-app --bin garden-autoplay -- --map graveyard --difficulty hard --waves 15
//! RUST_LOG=garden_sim=debug cargo run -p garden-app --bin garden-autoplay
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use garden_app::autoplay::{run_autoplay, AutoplayConfig};
use garden_app::persistence::MetaProgress;
use garden_core::balance::BalanceTable;

#[derive(Parser)]
#[command(name = "garden-autoplay")]
#[command(about = "Headless garden defense session with automatic building")]
#[command(version)]
struct Cli {
    /// Map key
    #[arg(short, long, default_value = "garden")]
    map: String,

    /// Difficulty key
    #[arg(short, long, default_value = "medium")]
    difficulty: String,

    /// Stop after clearing this many waves
    #[arg(short, long, default_value = "10")]
    waves: u32,

    /// RNG seed
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Meta progression save file
    #[arg(long, default_value = "garden_save.json")]
    save: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let balance = match BalanceTable::builtin() {
        Ok(balance) => balance,
        Err(err) => {
            error!(error = %err, "bundled balance table is invalid");
            return ExitCode::FAILURE;
        }
    };
    let mut progress = MetaProgress::load_or_default(&cli.save, &balance);

    let mut config = AutoplayConfig::new(&cli.map, &cli.difficulty, cli.seed, cli.waves);
    config.loadout = Some(progress.towers.clone());
    let report = match run_autoplay(&config) {
        Ok(report) => report,
        Err(err) => {
            error!(error = %err, "session refused to start");
            return ExitCode::FAILURE;
        }
    };

    progress.credit_session(report.meta_gold, report.xp);
    if let Err(err) = progress.save(&cli.save) {
        error!(error = %err, "failed to save progress");
    }
    info!(meta_money = progress.meta_money, xp = progress.xp, "profile updated");

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            error!(error = %err, "failed to serialize report");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

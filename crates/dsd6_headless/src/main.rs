//! Headless Deep Space D6 session.
//!
//! Runs a session without graphics, controlled via JSON on stdin/stdout.
//!
//! # Usage
//!
//! ```bash
//! # Bundled data, entropy-seeded shuffles
//! cargo run -p dsd6_headless
//!
//! # Another data directory and ship, reproducible deck
//! cargo run -p dsd6_headless -- --data-dir my_data --ship-name valiant --reproducible --seed 7
//! ```
//!
//! # Protocol
//!
//! Input (stdin): JSON commands, one per line
//! Output (stdout): JSON responses, one per line
//! Logs (stderr): Debug information

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dsd6_headless::runner::{HeadlessConfig, HeadlessRunner};

#[derive(Parser)]
#[command(name = "dsd6_headless")]
#[command(about = "Headless Deep Space D6 session for scripted play and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding the threat catalogue and ship files
    #[arg(long, env = "DSD6_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Threat catalogue file (.json or .ron)
    #[arg(long)]
    catalogue: Option<PathBuf>,

    /// Ship file (.json or .ron)
    #[arg(long)]
    ship: Option<PathBuf>,

    /// Ship to pick from the data directory, by file name without extension
    #[arg(long)]
    ship_name: Option<String>,

    /// Shuffle reproducibly
    #[arg(long)]
    reproducible: bool,

    /// Seed for the deck and dice
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for protocol)
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let config = HeadlessConfig {
        data_dir: cli.data_dir,
        catalogue: cli.catalogue,
        ship: cli.ship,
        ship_name: cli.ship_name,
        reproducible: cli.reproducible,
        seed: cli.seed,
    };

    let mut runner = match HeadlessRunner::new(&config) {
        Ok(runner) => runner,
        Err(e) => {
            tracing::error!("Failed to start session: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = runner.run(io::stdin().lock(), io::stdout().lock()) {
        tracing::error!("Session I/O failed: {e}");
        std::process::exit(1);
    }
}

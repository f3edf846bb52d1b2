//! Deep Space D6 - Development Tools

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use dsd6_core::data::ThreatCatalogue;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dsd6-tools")]
#[command(about = "Development tools for Deep Space D6")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate data files
    Validate {
        /// Path to data directory
        #[arg(default_value = "assets/data")]
        path: String,
    },
    /// Print the dealing order of a reproducible deck
    Deal {
        /// Card catalogue file (.json or .ron)
        #[arg(long)]
        cards: PathBuf,
        /// Shuffle seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { path } => {
            tracing::info!("Validating data files in: {path}");
            match dsd6_tools::validate::validate_data_directory(Path::new(&path)) {
                Ok(report) => tracing::info!(
                    catalogues = report.catalogues,
                    ships = report.ships,
                    cards = report.cards,
                    "Validation passed"
                ),
                Err(e) => {
                    if let dsd6_tools::validate::ValidateError::Invalid { failures, .. } = &e {
                        for (file, error) in failures {
                            tracing::error!("{}: {error}", file.display());
                        }
                    }
                    tracing::error!("Validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Deal { cards, seed, json } => {
            let catalogue = match ThreatCatalogue::load_file(&cards) {
                Ok(catalogue) => catalogue,
                Err(e) => {
                    tracing::error!("Failed to load {}: {e}", cards.display());
                    std::process::exit(1);
                }
            };

            let dealt = dsd6_tools::deal::deal(&catalogue, seed);
            if json {
                match serde_json::to_string_pretty(&dealt) {
                    Ok(text) => println!("{text}"),
                    Err(e) => {
                        tracing::error!("Failed to encode deck: {e}");
                        std::process::exit(1);
                    }
                }
            } else {
                println!("Deck for seed {seed} ({} cards):", dealt.len());
                for card in &dealt {
                    println!("{card}");
                }
            }
        }
    }
}

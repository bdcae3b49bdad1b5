//! Noughts - unified CLI
//!
//! Offline play against the computer, a scripted online demo, and the score
//! tally.

#![warn(missing_docs)]

mod cli;
mod demo;
mod play;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use noughts::{AppConfig, ScoreStore};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    let config = AppConfig::load_or_default(&cli.config)?;

    match cli.command {
        Command::Play { difficulty, fresh } => play::run(&config, difficulty, fresh).await,
        Command::Demo { host, guest } => demo::run(&host, &guest).await,
        Command::Scores => print_scores(&config),
    }
}

/// Print the persisted offline tally
#[instrument(skip(config))]
fn print_scores(config: &AppConfig) -> Result<()> {
    let store = ScoreStore::new(config.scores_path());
    let scores = store.load()?;
    println!("{}", scores);
    println!("Games played: {}", scores.total());
    Ok(())
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,noughts=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Tracing initialized");
}

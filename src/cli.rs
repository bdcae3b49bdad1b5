//! Command-line interface for noughts.

use clap::{Parser, Subcommand};
use noughts::Difficulty;

/// Noughts - tic-tac-toe against the computer or another player
#[derive(Parser, Debug)]
#[command(name = "noughts")]
#[command(about = "Tic-tac-toe with a tiered AI and synced online sessions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "noughts.toml", global = true)]
    pub config: std::path::PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play against the computer on the terminal
    Play {
        /// AI strength (easy, harder, expert); overrides the config file
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Start fresh instead of resuming the saved game
        #[arg(long)]
        fresh: bool,
    },

    /// Run a scripted online match between two in-process players
    Demo {
        /// Identity of the player who creates the session
        #[arg(long, default_value = "alice")]
        host: String,

        /// Identity of the player who joins
        #[arg(long, default_value = "bob")]
        guest: String,
    },

    /// Print the offline score tally
    Scores,
}

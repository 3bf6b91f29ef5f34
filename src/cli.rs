//! Command-line interface for quantum_games.

use clap::{Parser, Subcommand};

/// Quantum Games - quantum tic-tac-toe rules engine
#[derive(Parser, Debug)]
#[command(name = "quantum_games")]
#[command(about = "Replay and inspect quantum tic-tac-toe games", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a TOML game script and print the final position
    Play {
        /// Path to the game script
        #[arg(short, long)]
        script: std::path::PathBuf,

        /// Print the final snapshot as JSON instead of a board
        #[arg(long)]
        json: bool,

        /// Print the position after every accepted step
        #[arg(short, long)]
        verbose: bool,
    },

    /// Walk through a three-move cycle and its collapse
    Demo,
}

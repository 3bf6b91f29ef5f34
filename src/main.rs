//! Quantum Games - Unified CLI
//!
//! Replays scripted quantum tic-tac-toe games.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use quantum_games::{GameScript, GameSnapshot, QuantumGame};
use std::path::Path;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Play {
            script,
            json,
            verbose,
        } => run_play(&script, json, verbose),
        Command::Demo => run_demo(),
    }
}

/// Replay a script file and print the result
#[instrument(skip_all, fields(script = %path.display()))]
fn run_play(path: &Path, json: bool, verbose: bool) -> Result<()> {
    let script = GameScript::from_file(path)?;
    info!(name = %script.name(), steps = script.steps().len(), "Replaying script");

    let run = script
        .run()
        .with_context(|| format!("script '{}' failed", script.name()))?;

    if verbose {
        for (index, snapshot) in run.snapshots().iter().enumerate() {
            println!("--- after accepted step {} ---", index + 1);
            println!("{}\n", snapshot.render());
        }
    }
    for rejection in run.rejections() {
        println!("step {} rejected (expected): {}", rejection.step, rejection.error);
    }

    print_snapshot(&run.final_snapshot(), json)
}

/// Play the canonical triangle: X(0,1), O(1,2), X(2,0), O collapses move 3 onto 2
fn run_demo() -> Result<()> {
    let mut game = QuantumGame::new();

    for (a, b) in [(0, 1), (1, 2), (2, 0)] {
        let snapshot = game.submit_move(a, b)?;
        println!("{}\n", snapshot.render());
    }

    let snapshot = game.apply_collapse_choice(2)?;
    if let Some(report) = snapshot.last_collapse() {
        for (id, cell) in report.resolved() {
            println!("move {} collapsed to {}", id, cell);
        }
        println!();
    }
    print_snapshot(&snapshot, false)
}

fn print_snapshot(snapshot: &GameSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", snapshot.to_json()?);
    } else {
        println!("{}", snapshot.render());
    }
    Ok(())
}

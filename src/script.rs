//! Scripted games loaded from TOML.
//!
//! A script is a list of steps, each one session command, optionally
//! marked as expected to be rejected:
//!
//! ```toml
//! name = "triangle"
//!
//! [[steps]]
//! action = "move"
//! cells = [0, 1]
//!
//! [[steps]]
//! action = "move"
//! cells = [3, 3]
//! expect = "rejected"
//!
//! [[steps]]
//! action = "collapse"
//! cell = 2
//! ```

use derive_getters::Getters;
use derive_more::{Display, Error};
use quantum_tictactoe::{Command, GameSnapshot, QuantumGame, SessionError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Whether a step should be accepted or rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    /// The command must succeed.
    #[default]
    Accepted,
    /// The command must be rejected; the run continues.
    Rejected,
}

/// One scripted step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Submit a quantum move.
    Move {
        /// The two cells.
        cells: [usize; 2],
        /// Expected result.
        #[serde(default)]
        expect: Expectation,
    },
    /// Choose the closer's cell.
    Collapse {
        /// The chosen cell.
        cell: usize,
        /// Expected result.
        #[serde(default)]
        expect: Expectation,
    },
    /// Reset the game.
    Reset,
}

impl ScriptStep {
    /// The session command this step issues.
    pub fn command(&self) -> Command {
        match *self {
            ScriptStep::Move { cells: [a, b], .. } => Command::Submit { a, b },
            ScriptStep::Collapse { cell, .. } => Command::Collapse { cell },
            ScriptStep::Reset => Command::Reset,
        }
    }

    /// Expected result of the step.
    pub fn expect(&self) -> Expectation {
        match *self {
            ScriptStep::Move { expect, .. } | ScriptStep::Collapse { expect, .. } => expect,
            ScriptStep::Reset => Expectation::Accepted,
        }
    }
}

/// A named sequence of steps.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct GameScript {
    /// Script name, used in logs.
    #[serde(default = "default_name")]
    name: String,

    /// Steps in order.
    #[serde(default)]
    steps: Vec<ScriptStep>,
}

fn default_name() -> String {
    "untitled".to_string()
}

/// A step the script expected to be rejected, and why it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedRejection {
    /// Zero-based step index.
    pub step: usize,
    /// The rejection.
    pub error: SessionError,
}

/// Result of running a script.
#[derive(Debug, Clone, Getters)]
pub struct ScriptRun {
    /// Snapshot after each accepted step.
    snapshots: Vec<GameSnapshot>,
    /// Rejections the script asked for.
    rejections: Vec<ExpectedRejection>,
    /// The session after the last step.
    game: QuantumGame,
}

impl ScriptRun {
    /// Snapshot of the final state.
    pub fn final_snapshot(&self) -> GameSnapshot {
        self.game.snapshot()
    }
}

impl GameScript {
    /// Creates a script from steps.
    pub fn new(name: impl Into<String>, steps: Vec<ScriptStep>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    /// Parses a script from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ScriptError> {
        let script: Self = toml::from_str(content)
            .map_err(|e| ScriptError::new(format!("Failed to parse script: {}", e)))?;
        debug!(name = %script.name, steps = script.steps.len(), "Script parsed");
        Ok(script)
    }

    /// Loads a script from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ScriptError::new(format!("Failed to read script file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Runs every step against a fresh game.
    ///
    /// # Errors
    ///
    /// Fails on the first step whose result differs from its expectation.
    #[instrument(skip(self), fields(name = %self.name))]
    pub fn run(&self) -> Result<ScriptRun, ScriptError> {
        let mut game = QuantumGame::new();
        let mut snapshots = Vec::new();
        let mut rejections = Vec::new();

        for (index, step) in self.steps.iter().enumerate() {
            let command = step.command();
            match (game.apply(command), step.expect()) {
                (Ok(snapshot), Expectation::Accepted) => {
                    debug!(step = index, %command, status = %snapshot.status(), "Step accepted");
                    snapshots.push(snapshot);
                }
                (Err(error), Expectation::Rejected) => {
                    debug!(step = index, %command, %error, "Step rejected as expected");
                    rejections.push(ExpectedRejection { step: index, error });
                }
                (Ok(_), Expectation::Rejected) => {
                    warn!(step = index, %command, "Step unexpectedly accepted");
                    return Err(ScriptError::new(format!(
                        "step {} ({}) was expected to be rejected",
                        index, command
                    )));
                }
                (Err(error), Expectation::Accepted) => {
                    warn!(step = index, %command, %error, "Step unexpectedly rejected");
                    return Err(ScriptError::new(format!(
                        "step {} ({}) rejected: {}",
                        index, command, error
                    )));
                }
            }
        }

        info!(
            steps = self.steps.len(),
            rejected = rejections.len(),
            "Script complete"
        );
        Ok(ScriptRun {
            snapshots,
            rejections,
            game,
        })
    }
}

/// Script loading or execution error.
#[derive(Debug, Clone, Display, Error)]
#[display("Script error: {} at {}:{}", message, file, line)]
pub struct ScriptError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ScriptError {
    /// Creates a new script error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

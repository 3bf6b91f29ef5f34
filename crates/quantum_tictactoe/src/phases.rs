//! Session phases and the data each phase carries.
//!
//! The phase enum carries exactly what the phase needs: a pending collapse
//! always knows its closer and chooser, a terminal game always has an
//! outcome.

use super::{MoveId, Player, Position};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Player completed a win line.
    Winner(Player),
    /// No win line and no legal move left.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Winner(player) => Some(*player),
            Outcome::Draw => None,
        }
    }

    /// Returns true if the game was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(player) => write!(f, "Player {} wins", player),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// A closed cycle waiting for the chooser to pick the closer's cell.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct PendingCollapse {
    /// Move ids along the cycle, closer last.
    cycle: Vec<MoveId>,
    /// The move that closed the cycle.
    closer: MoveId,
    /// The closer's two cells; the choice must be one of them.
    candidates: [Position; 2],
    /// Opponent of the player who closed the cycle.
    chooser: Player,
}

impl PendingCollapse {
    /// Records a freshly closed cycle.
    pub fn new(cycle: Vec<MoveId>, closer: MoveId, candidates: [Position; 2], chooser: Player) -> Self {
        Self {
            cycle,
            closer,
            candidates,
            chooser,
        }
    }

    /// Whether `cell` is one of the closer's cells.
    pub fn is_candidate(&self, cell: Position) -> bool {
        self.candidates.contains(&cell)
    }
}

/// Where the session is in its state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "detail", rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the player to move to submit a quantum move.
    AwaitingMove,
    /// A cycle closed; only a collapse choice is accepted.
    PendingCollapse(PendingCollapse),
    /// The game is over. Absorbing until reset.
    Terminal(Outcome),
}

impl Phase {
    /// Returns the pending collapse, if any.
    pub fn pending(&self) -> Option<&PendingCollapse> {
        match self {
            Phase::PendingCollapse(pending) => Some(pending),
            _ => None,
        }
    }

    /// Returns the outcome, if the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Phase::Terminal(outcome) => Some(*outcome),
            _ => None,
        }
    }

    /// Returns true if the game is over.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Terminal(_))
    }
}

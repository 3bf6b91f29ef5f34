//! Quantum moves as first-class domain values.
//!
//! A quantum move places one ghost mark in each of two cells. It is an
//! undirected edge of the entanglement graph until it collapses onto one of
//! its endpoints, after which it is a classical mark.

use super::{Player, Position};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Sequential move number, starting at 1 and never reused.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[display("{}", _0)]
pub struct MoveId(pub u32);

impl MoveId {
    /// The id of the first move of a game.
    pub const FIRST: MoveId = MoveId(1);

    /// The id that follows this one.
    pub fn next(self) -> Self {
        MoveId(self.0 + 1)
    }
}

/// One turn's quantum placement.
///
/// Everything except `resolved` is fixed at creation; `resolved` is written
/// exactly once, by collapse propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantumMove {
    id: MoveId,
    player: Player,
    a: Position,
    b: Position,
    resolved: Option<Position>,
}

impl QuantumMove {
    /// Creates an unresolved move. The caller guarantees `a != b`.
    #[instrument]
    pub fn new(id: MoveId, player: Player, a: Position, b: Position) -> Self {
        debug_assert_ne!(a, b, "a quantum move needs two distinct cells");
        Self {
            id,
            player,
            a,
            b,
            resolved: None,
        }
    }

    /// Returns the move number.
    pub fn id(&self) -> MoveId {
        self.id
    }

    /// Returns the player who made the move.
    pub fn player(&self) -> Player {
        self.player
    }

    /// Returns both candidate cells.
    pub fn cells(&self) -> [Position; 2] {
        [self.a, self.b]
    }

    /// Returns the cell this move collapsed to, if it has.
    pub fn resolved(&self) -> Option<Position> {
        self.resolved
    }

    /// Whether the move is still a ghost.
    pub fn is_unresolved(&self) -> bool {
        self.resolved.is_none()
    }

    /// Whether `cell` is one of the move's two endpoints.
    pub fn touches(&self, cell: Position) -> bool {
        self.a == cell || self.b == cell
    }

    /// The endpoint opposite `cell`, `None` if `cell` is not an endpoint.
    pub fn other_end(&self, cell: Position) -> Option<Position> {
        if cell == self.a {
            Some(self.b)
        } else if cell == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    /// Ghost label such as `X3`.
    pub fn label(&self) -> String {
        format!("{}{}", self.player, self.id)
    }

    /// Fixes the outcome. Only collapse propagation calls this.
    pub(crate) fn resolve_to(&mut self, cell: Position) {
        debug_assert!(self.touches(cell));
        debug_assert!(self.resolved.is_none());
        self.resolved = Some(cell);
    }
}

impl std::fmt::Display for QuantumMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.resolved {
            Some(cell) => write!(f, "{} -> {}", self.label(), cell),
            None => write!(f, "{} ({}, {})", self.label(), self.a, self.b),
        }
    }
}

/// A command from the presentation layer.
///
/// Cells are raw indices; the session validates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    /// Propose a quantum move across two cells.
    Submit {
        /// First cell index.
        a: usize,
        /// Second cell index.
        b: usize,
    },
    /// Pick the closer's final cell while a collapse is pending.
    Collapse {
        /// Chosen cell index.
        cell: usize,
    },
    /// Start over.
    Reset,
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Submit { a, b } => write!(f, "move {}-{}", a, b),
            Command::Collapse { cell } => write!(f, "collapse to {}", cell),
            Command::Reset => write!(f, "reset"),
        }
    }
}

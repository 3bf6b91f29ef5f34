//! Rejections and diagnostics of the rules engine.
//!
//! Every rejection is reported before any state is touched, so a rejected
//! command leaves the game exactly as it was.

use super::{MoveId, Player, Position};
use serde::{Deserialize, Serialize};

/// Why a proposed pair of cells is not a legal quantum move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum SelectionFault {
    /// Both cells are the same.
    #[display("both cells are {}", _0)]
    SameCell(usize),
    /// A cell index is outside 0-8.
    #[display("cell {} is off the board", _0)]
    OutOfRange(usize),
    /// A cell already holds a classical mark.
    #[display("cell {} is already classical", _0)]
    Classical(Position),
}

/// Why the game is not accepting moves right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum MoveBlock {
    /// The game has ended.
    #[display("game is already over")]
    GameOver,
    /// A cycle closed and its collapse has not been chosen yet.
    #[display("a collapse is pending")]
    CollapsePending,
}

/// Error returned when a session command is rejected.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SessionError {
    /// The proposed move's cells are equal, off the board or classical.
    #[display("Invalid selection: {}", _0)]
    InvalidSelection(SelectionFault),

    /// A move was submitted while the game is over or a collapse is pending.
    #[display("Cannot move: {}", _0)]
    IllegalStateForMove(MoveBlock),

    /// A collapse choice was made while no collapse is pending.
    #[display("No collapse is pending")]
    IllegalStateForChoice,

    /// The chosen cell is not one of the closer's two cells.
    #[display("Cell {} is not a candidate (expected {} or {})", chosen, candidates[0], candidates[1])]
    InvalidChoice {
        /// The rejected cell index.
        chosen: usize,
        /// The closer's two cells.
        candidates: [Position; 2],
    },
}

impl std::error::Error for SessionError {}

/// Precondition failures of the collapse resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ResolveError {
    /// No move with this id exists.
    #[display("Move {} does not exist", _0)]
    UnknownMove(MoveId),
    /// The move has already collapsed.
    #[display("Move {} is already resolved", _0)]
    AlreadyResolved(MoveId),
    /// The chosen cell is not one of the move's endpoints.
    #[display("Cell {} is not an endpoint of move {}", cell, id)]
    NotAnEndpoint {
        /// The move.
        id: MoveId,
        /// The offending cell.
        cell: Position,
    },
}

impl std::error::Error for ResolveError {}

/// Propagation would have given a cell to a second move.
///
/// The move is left unresolved instead; the conflict is logged and kept in
/// the collapse report. Correct cycle detection makes this unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[display("Propagation conflict: move {} ({}) forced to {} which is held by {}", id, player, cell, holder)]
pub struct PropagationConflict {
    /// The move left unresolved.
    pub id: MoveId,
    /// Its player.
    pub player: Player,
    /// The cell it was forced onto.
    pub cell: Position,
    /// Who already holds the cell.
    pub holder: Player,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        let err = SessionError::InvalidSelection(SelectionFault::SameCell(3));
        assert_eq!(err.to_string(), "Invalid selection: both cells are 3");

        let err = SessionError::InvalidChoice {
            chosen: 5,
            candidates: [Position::TopRight, Position::TopLeft],
        };
        assert_eq!(err.to_string(), "Cell 5 is not a candidate (expected 2 or 0)");

        let err = SessionError::IllegalStateForMove(MoveBlock::CollapsePending);
        assert_eq!(err.to_string(), "Cannot move: a collapse is pending");
    }
}

//! Contract-based validation for session commands.
//!
//! Preconditions run before any state is touched and turn raw indices from
//! the presentation layer into checked values. Postconditions re-check the
//! game invariants after the command and run in debug builds only.

use super::error::{MoveBlock, SelectionFault, SessionError};
use super::invariants::{InvariantSet, InvariantViolation, QuantumInvariants};
use super::{MoveId, Phase, Position, QuantumGame};
use tracing::{error, instrument};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// Preconditions and postconditions of a state transition.
///
/// - Precondition: {P(state, action)}, checked before the action is applied.
/// - Postcondition: {Q(before, after)}, checked after it.
pub trait Contract<S, A> {
    /// What a passing precondition hands to the transition.
    type Checked;

    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<Self::Checked, SessionError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), Vec<InvariantViolation>>;
}

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// A two-cell selection as it arrives from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// First cell index.
    pub a: usize,
    /// Second cell index.
    pub b: usize,
}

/// Precondition: the session is awaiting a move.
pub struct AcceptingMoves;

impl AcceptingMoves {
    /// Rejects moves while the game is over or a collapse is pending.
    pub fn check(game: &QuantumGame) -> Result<(), SessionError> {
        match game.phase() {
            Phase::AwaitingMove => Ok(()),
            Phase::PendingCollapse(_) => {
                Err(SessionError::IllegalStateForMove(MoveBlock::CollapsePending))
            }
            Phase::Terminal(_) => Err(SessionError::IllegalStateForMove(MoveBlock::GameOver)),
        }
    }
}

/// Precondition: the cell index is on the board and not classical.
pub struct QuantumCell;

impl QuantumCell {
    /// Returns the validated position.
    pub fn check(game: &QuantumGame, index: usize) -> Result<Position, SessionError> {
        let pos = Position::from_index(index)
            .ok_or(SessionError::InvalidSelection(SelectionFault::OutOfRange(index)))?;
        if game.board().is_classical(pos) {
            return Err(SessionError::InvalidSelection(SelectionFault::Classical(pos)));
        }
        Ok(pos)
    }
}

/// Composite precondition for a quantum move.
pub struct LegalSelection;

impl LegalSelection {
    /// Validates state, range, distinctness and quantum-ness of both cells.
    #[instrument(skip(game))]
    pub fn check(game: &QuantumGame, selection: &Selection) -> Result<(Position, Position), SessionError> {
        AcceptingMoves::check(game)?;
        let a = QuantumCell::check(game, selection.a)?;
        let b = QuantumCell::check(game, selection.b)?;
        if a == b {
            return Err(SessionError::InvalidSelection(SelectionFault::SameCell(selection.a)));
        }
        Ok((a, b))
    }
}

/// Contract for `submit_move`.
pub struct SubmitContract;

impl Contract<QuantumGame, Selection> for SubmitContract {
    type Checked = (Position, Position);

    fn pre(game: &QuantumGame, selection: &Selection) -> Result<Self::Checked, SessionError> {
        LegalSelection::check(game, selection)
    }

    fn post(_before: &QuantumGame, after: &QuantumGame) -> Result<(), Vec<InvariantViolation>> {
        QuantumInvariants::check_all(after)
    }
}

// ─────────────────────────────────────────────────────────────
//  Collapse Preconditions
// ─────────────────────────────────────────────────────────────

/// Contract for `apply_collapse_choice`.
///
/// Preconditions:
/// - a collapse is pending
/// - the chosen cell is one of the closer's two cells
pub struct ChoiceContract;

impl Contract<QuantumGame, usize> for ChoiceContract {
    type Checked = (MoveId, Position);

    fn pre(game: &QuantumGame, cell: &usize) -> Result<Self::Checked, SessionError> {
        let pending = game.phase().pending().ok_or(SessionError::IllegalStateForChoice)?;
        let invalid = || SessionError::InvalidChoice {
            chosen: *cell,
            candidates: *pending.candidates(),
        };
        let chosen = Position::from_index(*cell).ok_or_else(invalid)?;
        if !pending.is_candidate(chosen) {
            return Err(invalid());
        }
        Ok((*pending.closer(), chosen))
    }

    fn post(_before: &QuantumGame, after: &QuantumGame) -> Result<(), Vec<InvariantViolation>> {
        QuantumInvariants::check_all(after)
    }
}

/// Logs every violation and fails debug builds.
pub fn enforce(result: Result<(), Vec<InvariantViolation>>) {
    if let Err(violations) = result {
        for violation in &violations {
            error!(invariant = %violation.description, "invariant violated");
        }
        debug_assert!(violations.is_empty(), "invariants violated: {:?}", violations);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Player, Square};

    #[test]
    fn test_precondition_accepts_open_cells() {
        let game = QuantumGame::new();
        let checked = SubmitContract::pre(&game, &Selection { a: 0, b: 8 }).unwrap();
        assert_eq!(checked, (Position::TopLeft, Position::BottomRight));
    }

    #[test]
    fn test_precondition_faults() {
        let game = QuantumGame::new();
        assert_eq!(
            SubmitContract::pre(&game, &Selection { a: 3, b: 3 }),
            Err(SessionError::InvalidSelection(SelectionFault::SameCell(3)))
        );
        assert_eq!(
            SubmitContract::pre(&game, &Selection { a: 2, b: 9 }),
            Err(SessionError::InvalidSelection(SelectionFault::OutOfRange(9)))
        );
    }

    #[test]
    fn test_precondition_rejects_while_pending() {
        let mut game = QuantumGame::new();
        game.submit_move(0, 1).unwrap();
        game.submit_move(1, 0).unwrap();
        assert_eq!(
            SubmitContract::pre(&game, &Selection { a: 4, b: 5 }),
            Err(SessionError::IllegalStateForMove(MoveBlock::CollapsePending))
        );
    }

    #[test]
    fn test_choice_precondition() {
        let mut game = QuantumGame::new();
        assert_eq!(ChoiceContract::pre(&game, &0), Err(SessionError::IllegalStateForChoice));

        game.submit_move(0, 1).unwrap();
        game.submit_move(1, 0).unwrap();
        assert_eq!(ChoiceContract::pre(&game, &1), Ok((MoveId(2), Position::TopCenter)));
        assert!(matches!(
            ChoiceContract::pre(&game, &4),
            Err(SessionError::InvalidChoice { chosen: 4, .. })
        ));
        assert!(matches!(
            ChoiceContract::pre(&game, &42),
            Err(SessionError::InvalidChoice { chosen: 42, .. })
        ));
    }

    #[test]
    fn test_postcondition_detects_corruption() {
        let before = QuantumGame::new();
        let mut after = before.clone();
        after.submit_move(0, 1).unwrap();
        assert!(SubmitContract::post(&before, &after).is_ok());

        after.board.set(Position::BottomRight, Square::Occupied(Player::X));
        assert!(SubmitContract::post(&before, &after).is_err());
    }
}

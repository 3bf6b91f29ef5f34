//! Full-board detection.

use super::super::{Board, Square};
use tracing::instrument;

/// Checks if every square holds a classical mark.
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

//! Win-line rules for the classical board.
//!
//! Pure functions over a board snapshot. Ghost marks never count; only
//! collapsed (classical) marks complete a line.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, check_winner, line_owners};

use super::{Board, Outcome};
use tracing::instrument;

/// Evaluates a classical board.
///
/// Returns the winner of the first completed line in canonical order
/// (rows, columns, diagonals), `Draw` if no line is complete and every cell
/// is classical, and `None` otherwise.
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> Option<Outcome> {
    if let Some(winner) = check_winner(board) {
        return Some(Outcome::Winner(winner));
    }
    if is_full(board) {
        return Some(Outcome::Draw);
    }
    None
}

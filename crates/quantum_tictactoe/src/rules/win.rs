//! Win detection.

use super::super::{Board, Player, Position, Square};
use tracing::instrument;

/// The eight win lines: rows, then columns, then diagonals.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopRight, Position::MiddleRight, Position::BottomRight],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Checks if there is a winner on the board.
///
/// Returns the player on the first complete line in `LINES` order.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Player> {
    LINES.iter().find_map(|&[a, b, c]| match board.get(a) {
        Square::Occupied(player) if board.get(b) == board.get(a) && board.get(c) == board.get(a) => {
            Some(player)
        }
        _ => None,
    })
}

/// Players that complete at least one line, in `LINES` order, deduplicated.
///
/// One collapse can complete lines for both players; `check_winner` then
/// picks the owner of the first line, which is the first entry here.
pub fn line_owners(board: &Board) -> Vec<Player> {
    let mut owners = Vec::new();
    for [a, b, c] in LINES {
        if let Square::Occupied(player) = board.get(a)
            && board.get(b) == board.get(a)
            && board.get(c) == board.get(a)
            && !owners.contains(&player)
        {
            owners.push(player);
        }
    }
    owners
}

//! The classical board is exactly the set of collapsed moves.

use super::super::{Board, QuantumGame, Square};
use super::Invariant;

/// Invariant: each classical cell belongs to exactly one resolved move of
/// the same player, and every resolved move's cell is classical.
///
/// Rebuilds the board from the move list and compares.
pub struct ExclusiveClaimInvariant;

impl Invariant<QuantumGame> for ExclusiveClaimInvariant {
    fn holds(game: &QuantumGame) -> bool {
        let mut rebuilt = Board::new();

        for mov in game.moves() {
            let Some(cell) = mov.resolved() else {
                continue;
            };
            // Two moves on one cell.
            if rebuilt.is_classical(cell) {
                return false;
            }
            rebuilt.set(cell, Square::Occupied(mov.player()));
        }

        rebuilt == *game.board()
    }

    fn description() -> &'static str {
        "Each classical cell is claimed by exactly one resolved move"
    }
}

//! Every collapsed move landed on one of its own two cells.

use super::super::QuantumGame;
use super::Invariant;

/// Invariant: a resolved move's cell is one of its endpoints.
pub struct ResolvedEndpointInvariant;

impl Invariant<QuantumGame> for ResolvedEndpointInvariant {
    fn holds(game: &QuantumGame) -> bool {
        game.moves()
            .iter()
            .all(|m| m.resolved().is_none_or(|cell| m.touches(cell)))
    }

    fn description() -> &'static str {
        "Resolved moves sit on one of their two cells"
    }
}

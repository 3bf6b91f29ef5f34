//! Move numbering and turn order.

use super::super::{MoveId, Phase, Player, QuantumGame};
use super::Invariant;

/// Invariant: move ids run 1, 2, 3, … with X on odd ids and O on even ids,
/// and the player to move matches the phase.
///
/// While awaiting a move it is the turn of the player after the last mover.
/// While a collapse is pending, or once the game is over, the turn has not
/// advanced past the last mover.
pub struct AlternatingTurnInvariant;

impl Invariant<QuantumGame> for AlternatingTurnInvariant {
    fn holds(game: &QuantumGame) -> bool {
        let mut expected_id = MoveId::FIRST;
        let mut expected_player = Player::X;
        for mov in game.moves() {
            if mov.id() != expected_id || mov.player() != expected_player {
                return false;
            }
            expected_id = expected_id.next();
            expected_player = expected_player.opponent();
        }

        match game.phase() {
            Phase::AwaitingMove => game.to_move() == expected_player,
            Phase::PendingCollapse(pending) => {
                game.to_move() == expected_player.opponent()
                    && *pending.chooser() == expected_player
            }
            Phase::Terminal(_) => game.to_move() == expected_player.opponent(),
        }
    }

    fn description() -> &'static str {
        "Players alternate and move ids are sequential"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holds_while_pending_and_after() {
        let mut game = QuantumGame::new();
        game.submit_move(0, 1).unwrap();
        game.submit_move(0, 1).unwrap();
        assert!(game.phase().pending().is_some());
        assert_eq!(game.to_move(), Player::O);
        assert!(AlternatingTurnInvariant::holds(&game));

        game.apply_collapse_choice(0).unwrap();
        assert_eq!(game.to_move(), Player::X);
        assert!(AlternatingTurnInvariant::holds(&game));
    }

    #[test]
    fn test_terminal_turn_stays_with_last_mover() {
        let mut game = QuantumGame::new();
        game.submit_move(0, 1).unwrap();
        game.submit_move(0, 1).unwrap();
        game.apply_collapse_choice(0).unwrap();
        game.phase = Phase::Terminal(crate::Outcome::Draw);
        assert!(!AlternatingTurnInvariant::holds(&game));

        game.to_move = Player::O;
        assert!(AlternatingTurnInvariant::holds(&game));
    }
}

//! Read-only views of a session for the presentation layer.

use super::collapse::CollapseReport;
use super::error::PropagationConflict;
use super::phases::{Outcome, PendingCollapse, Phase};
use super::{Board, Player, Position, QuantumMove};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Everything a presentation layer needs to draw the game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Classical marks.
    board: Board,
    /// All moves in turn order with their resolution status.
    moves: Vec<QuantumMove>,
    /// Player whose turn it is.
    to_move: Player,
    /// Current phase, including pending-collapse details or the outcome.
    phase: Phase,
    /// Report of the most recent collapse.
    last_collapse: Option<CollapseReport>,
}

impl GameSnapshot {
    pub(crate) fn new(
        board: Board,
        moves: Vec<QuantumMove>,
        to_move: Player,
        phase: Phase,
        last_collapse: Option<CollapseReport>,
    ) -> Self {
        Self {
            board,
            moves,
            to_move,
            phase,
            last_collapse,
        }
    }

    /// Pending collapse details, if a cycle is waiting for a choice.
    pub fn pending(&self) -> Option<&PendingCollapse> {
        self.phase.pending()
    }

    /// The outcome, if the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        self.phase.outcome()
    }

    /// Propagation conflicts reported by the most recent collapse.
    pub fn diagnostics(&self) -> &[PropagationConflict] {
        self.last_collapse
            .as_ref()
            .map(|report| report.conflicts().as_slice())
            .unwrap_or_default()
    }

    /// Unresolved moves with a ghost mark in `pos`, in turn order.
    pub fn ghosts(&self, pos: Position) -> Vec<&QuantumMove> {
        self.moves
            .iter()
            .filter(|m| m.is_unresolved() && m.touches(pos))
            .collect()
    }

    /// Text rendering: classical board, ghost marks, and status line.
    #[instrument(skip(self))]
    pub fn render(&self) -> String {
        let mut out = self.board.display();
        out.push('\n');

        let ghost_lines: Vec<String> = Position::ALL
            .iter()
            .filter_map(|&pos| {
                let ghosts = self.ghosts(pos);
                if ghosts.is_empty() {
                    return None;
                }
                let labels: Vec<String> = ghosts.iter().map(|m| m.label()).collect();
                Some(format!("  {}: {}", pos, labels.join(" ")))
            })
            .collect();
        if !ghost_lines.is_empty() {
            out.push_str("\nGhosts:\n");
            out.push_str(&ghost_lines.join("\n"));
            out.push('\n');
        }

        out.push('\n');
        out.push_str(&self.status());
        for conflict in self.diagnostics() {
            out.push_str(&format!("\nwarning: {}", conflict));
        }
        out
    }

    /// One-line status.
    pub fn status(&self) -> String {
        match &self.phase {
            Phase::AwaitingMove => format!("{} to move", self.to_move),
            Phase::PendingCollapse(pending) => {
                let [a, b] = *pending.candidates();
                format!(
                    "Cycle closed by move {}; {} chooses {} or {}",
                    pending.closer(),
                    pending.chooser(),
                    a,
                    b
                )
            }
            Phase::Terminal(outcome) => format!("Game over: {}", outcome),
        }
    }

    /// Serializes the snapshot as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::QuantumGame;
    use crate::Position;

    #[test]
    fn test_ghosts_and_status() {
        let mut game = QuantumGame::new();
        game.submit_move(0, 1).unwrap();
        let snapshot = game.submit_move(1, 2).unwrap();

        let labels: Vec<String> = snapshot
            .ghosts(Position::TopCenter)
            .iter()
            .map(|m| m.label())
            .collect();
        assert_eq!(labels, vec!["X1", "O2"]);
        assert_eq!(snapshot.status(), "X to move");
        assert!(snapshot.render().contains("  1: X1 O2"));
    }

    #[test]
    fn test_pending_status() {
        let mut game = QuantumGame::new();
        game.submit_move(0, 1).unwrap();
        let snapshot = game.submit_move(1, 0).unwrap();
        assert_eq!(snapshot.status(), "Cycle closed by move 2; X chooses 1 or 0");
    }

    #[test]
    fn test_json_round_trip() {
        let mut game = QuantumGame::new();
        game.submit_move(0, 1).unwrap();
        game.submit_move(1, 0).unwrap();
        let snapshot = game.apply_collapse_choice(1).unwrap();

        let json = snapshot.to_json().unwrap();
        let back: super::GameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
        assert!(json.contains("\"awaiting_move\""));
    }
}

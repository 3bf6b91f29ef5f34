//! Collapse propagation.
//!
//! Once the chooser fixes the closer's cell, every move sharing that cell
//! is forced onto its other endpoint, which in turn forces its neighbors,
//! until nothing more is forced. A work queue drives the propagation; a
//! sweep afterwards catches unresolved moves left touching a classical cell
//! and feeds them back into the queue.

use super::error::{PropagationConflict, ResolveError};
use super::{Board, MoveId, Player, Position, QuantumMove, Square};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, instrument, trace, warn};

/// What a collapse did.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct CollapseReport {
    /// The move whose cell was chosen.
    closer: MoveId,
    /// The chosen cell.
    chosen: Position,
    /// Resolutions in the order they were applied.
    resolved: Vec<(MoveId, Position)>,
    /// Moves left unresolved because their forced cell was taken.
    conflicts: Vec<PropagationConflict>,
}

impl CollapseReport {
    fn new(closer: MoveId, chosen: Position) -> Self {
        Self {
            closer,
            chosen,
            resolved: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    fn record_conflict(&mut self, conflict: PropagationConflict) {
        if self.conflicts.iter().any(|c| c.id == conflict.id) {
            return;
        }
        warn!(%conflict, "collapse left a move unresolved");
        self.conflicts.push(conflict);
    }
}

/// Result of processing one queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The move was resolved onto the cell.
    Resolved,
    /// The move was already resolved (or unknown); nothing changed.
    Skipped,
    /// The cell was already classical; the move stays unresolved.
    Conflict,
}

/// One collapse in progress.
///
/// Holds exclusive borrows of the move list and board for its lifetime, so
/// nothing else can observe a half-propagated state.
#[derive(Debug)]
pub struct Collapse<'a> {
    moves: &'a mut [QuantumMove],
    board: &'a mut Board,
    queue: VecDeque<(MoveId, Position)>,
    report: CollapseReport,
}

impl<'a> Collapse<'a> {
    /// Validates the choice and seeds the queue with `(closer, chosen)`.
    ///
    /// # Errors
    ///
    /// Fails if the closer does not exist, is already resolved, or `chosen`
    /// is not one of its cells.
    #[instrument(skip(moves, board))]
    pub fn new(
        moves: &'a mut [QuantumMove],
        board: &'a mut Board,
        closer: MoveId,
        chosen: Position,
    ) -> Result<Self, ResolveError> {
        let mov = moves
            .iter()
            .find(|m| m.id() == closer)
            .ok_or(ResolveError::UnknownMove(closer))?;
        if !mov.is_unresolved() {
            return Err(ResolveError::AlreadyResolved(closer));
        }
        if !mov.touches(chosen) {
            return Err(ResolveError::NotAnEndpoint { id: closer, cell: chosen });
        }

        Ok(Self {
            moves,
            board,
            queue: VecDeque::from([(closer, chosen)]),
            report: CollapseReport::new(closer, chosen),
        })
    }

    /// Resolves one move onto `cell` and enqueues the moves it forces.
    ///
    /// Calling this for a move that is already resolved is a no-op.
    pub fn step(&mut self, id: MoveId, cell: Position) -> Step {
        let Some(index) = self.moves.iter().position(|m| m.id() == id) else {
            return Step::Skipped;
        };
        let mov = self.moves[index];
        if !mov.is_unresolved() {
            trace!(%id, "already resolved");
            return Step::Skipped;
        }
        if let Square::Occupied(holder) = self.board.get(cell) {
            self.report.record_conflict(PropagationConflict {
                id,
                player: mov.player(),
                cell,
                holder,
            });
            return Step::Conflict;
        }

        self.moves[index].resolve_to(cell);
        self.board.set(cell, Square::Occupied(mov.player()));
        self.report.resolved.push((id, cell));
        debug!(%id, %cell, player = %mov.player(), "move collapsed");

        let forced: Vec<(MoveId, Player, Position)> = self
            .moves
            .iter()
            .filter(|m| m.is_unresolved())
            .filter_map(|m| m.other_end(cell).map(|other| (m.id(), m.player(), other)))
            .collect();

        for (other_id, player, target) in forced {
            match self.board.get(target) {
                Square::Empty => {
                    trace!(id = %other_id, cell = %target, "forced");
                    self.queue.push_back((other_id, target));
                }
                Square::Occupied(holder) => self.report.record_conflict(PropagationConflict {
                    id: other_id,
                    player,
                    cell: target,
                    holder,
                }),
            }
        }
        Step::Resolved
    }

    /// Processes the queue until it is empty.
    fn drain(&mut self) {
        while let Some((id, cell)) = self.queue.pop_front() {
            self.step(id, cell);
        }
    }

    /// Enqueues every unresolved move with exactly one classical endpoint
    /// onto its free endpoint. Returns whether anything was enqueued.
    fn sweep(&mut self) -> bool {
        let mut found = false;
        for mov in self.moves.iter().filter(|m| m.is_unresolved()) {
            let [a, b] = mov.cells();
            match (self.board.get(a), self.board.get(b)) {
                (Square::Occupied(_), Square::Empty) => {
                    self.queue.push_back((mov.id(), b));
                    found = true;
                }
                (Square::Empty, Square::Occupied(_)) => {
                    self.queue.push_back((mov.id(), a));
                    found = true;
                }
                (Square::Occupied(_), Square::Occupied(holder)) => {
                    self.report.record_conflict(PropagationConflict {
                        id: mov.id(),
                        player: mov.player(),
                        cell: b,
                        holder,
                    });
                }
                (Square::Empty, Square::Empty) => {}
            }
        }
        if found {
            debug!(queued = self.queue.len(), "sweep forced further moves");
        }
        found
    }

    /// Runs propagation to a fixed point and returns the report.
    #[instrument(skip(self), fields(closer = %self.report.closer, chosen = %self.report.chosen))]
    pub fn run(mut self) -> CollapseReport {
        self.drain();
        while self.sweep() {
            self.drain();
        }
        debug!(
            resolved = self.report.resolved.len(),
            conflicts = self.report.conflicts.len(),
            "collapse complete"
        );
        self.report
    }
}

/// Collapses `closer` onto `chosen` and propagates every forced resolution.
///
/// Mutates `moves` and `board` in place.
///
/// # Errors
///
/// See [`Collapse::new`]. Nothing is mutated on error.
pub fn resolve(
    moves: &mut [QuantumMove],
    board: &mut Board,
    closer: MoveId,
    chosen: Position,
) -> Result<CollapseReport, ResolveError> {
    Ok(Collapse::new(moves, board, closer, chosen)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(id: u32, a: usize, b: usize) -> QuantumMove {
        let player = if id % 2 == 1 { Player::X } else { Player::O };
        QuantumMove::new(MoveId(id), player, Position::ALL[a], Position::ALL[b])
    }

    fn triangle() -> Vec<QuantumMove> {
        vec![mv(1, 0, 1), mv(2, 1, 2), mv(3, 2, 0)]
    }

    #[test]
    fn test_triangle_propagates_around_cycle() {
        let mut moves = triangle();
        let mut board = Board::new();
        let report = resolve(&mut moves, &mut board, MoveId(3), Position::TopRight).unwrap();

        assert_eq!(
            report.resolved(),
            &vec![
                (MoveId(3), Position::TopRight),
                (MoveId(2), Position::TopCenter),
                (MoveId(1), Position::TopLeft),
            ]
        );
        assert!(report.conflicts().is_empty());
        assert_eq!(board.get(Position::TopLeft), Square::Occupied(Player::X));
        assert_eq!(board.get(Position::TopCenter), Square::Occupied(Player::O));
        assert_eq!(board.get(Position::TopRight), Square::Occupied(Player::X));
    }

    #[test]
    fn test_branch_hanging_off_cycle_is_forced() {
        // Triangle 0-1-2 plus move 4 hanging off cell 1 towards 4.
        let mut moves = vec![mv(1, 0, 1), mv(2, 1, 2), mv(4, 1, 4), mv(5, 2, 0)];
        let mut board = Board::new();
        let report = resolve(&mut moves, &mut board, MoveId(5), Position::TopLeft).unwrap();

        // 5 -> 0 forces 1 -> 1, which forces 2 -> 2 and 4 -> 4.
        assert_eq!(report.resolved().len(), 4);
        assert!(moves.iter().all(|m| !m.is_unresolved()));
        assert_eq!(moves[2].resolved(), Some(Position::Center));
        assert_eq!(board.get(Position::Center), Square::Occupied(Player::O));
    }

    #[test]
    fn test_unconnected_moves_stay_quantum() {
        let mut moves = triangle();
        moves.push(mv(4, 6, 7));
        let mut board = Board::new();
        resolve(&mut moves, &mut board, MoveId(3), Position::TopLeft).unwrap();
        assert!(moves[3].is_unresolved());
        assert!(board.is_empty(Position::BottomLeft));
        assert!(board.is_empty(Position::BottomCenter));
    }

    #[test]
    fn test_two_cycle_resolves_both() {
        let mut moves = vec![mv(1, 3, 5), mv(2, 5, 3)];
        let mut board = Board::new();
        resolve(&mut moves, &mut board, MoveId(2), Position::MiddleLeft).unwrap();
        assert_eq!(moves[0].resolved(), Some(Position::MiddleRight));
        assert_eq!(moves[1].resolved(), Some(Position::MiddleLeft));
    }

    #[test]
    fn test_step_twice_is_noop() {
        let mut moves = triangle();
        let mut board = Board::new();
        let mut collapse =
            Collapse::new(&mut moves, &mut board, MoveId(3), Position::TopRight).unwrap();

        assert_eq!(collapse.step(MoveId(3), Position::TopRight), Step::Resolved);
        let queued = collapse.queue.len();
        assert_eq!(collapse.step(MoveId(3), Position::TopRight), Step::Skipped);
        assert_eq!(collapse.step(MoveId(3), Position::TopLeft), Step::Skipped);
        assert_eq!(collapse.queue.len(), queued);
        assert_eq!(collapse.report.resolved.len(), 1);
    }

    #[test]
    fn test_conflict_leaves_move_unresolved() {
        // Move 2 spans two cells that both end up classical.
        let mut moves = vec![mv(1, 0, 1), mv(2, 0, 1), mv(3, 0, 1)];
        let mut board = Board::new();
        board.set(Position::TopCenter, Square::Occupied(Player::O));

        let report = resolve(&mut moves, &mut board, MoveId(1), Position::TopLeft).unwrap();

        assert_eq!(report.resolved(), &vec![(MoveId(1), Position::TopLeft)]);
        assert!(moves[1].is_unresolved());
        assert!(moves[2].is_unresolved());
        assert_eq!(report.conflicts().len(), 2);
        assert_eq!(report.conflicts()[0].id, MoveId(2));
        assert_eq!(report.conflicts()[0].holder, Player::O);
        assert_eq!(board.get(Position::TopLeft), Square::Occupied(Player::X));
    }

    #[test]
    fn test_sweep_catches_move_touching_classical_cell() {
        // Move 2 touches cell 4, which is classical before the collapse starts.
        let mut moves = vec![mv(1, 0, 1), mv(2, 4, 5), mv(3, 1, 0)];
        let mut board = Board::new();
        board.set(Position::Center, Square::Occupied(Player::X));

        let report = resolve(&mut moves, &mut board, MoveId(3), Position::TopCenter).unwrap();

        assert_eq!(moves[1].resolved(), Some(Position::MiddleRight));
        assert_eq!(report.resolved().len(), 3);
    }

    #[test]
    fn test_preconditions() {
        let mut moves = triangle();
        let mut board = Board::new();
        assert_eq!(
            resolve(&mut moves, &mut board, MoveId(9), Position::TopLeft).unwrap_err(),
            ResolveError::UnknownMove(MoveId(9))
        );
        assert_eq!(
            resolve(&mut moves, &mut board, MoveId(3), Position::Center).unwrap_err(),
            ResolveError::NotAnEndpoint {
                id: MoveId(3),
                cell: Position::Center
            }
        );
        resolve(&mut moves, &mut board, MoveId(3), Position::TopLeft).unwrap();
        assert_eq!(
            resolve(&mut moves, &mut board, MoveId(3), Position::TopLeft).unwrap_err(),
            ResolveError::AlreadyResolved(MoveId(3))
        );
    }
}

//! The entanglement graph and cycle detection.
//!
//! Cells are nodes and every unresolved move is an undirected edge between
//! its two cells, tagged with the move's id. Because each closed cycle is
//! collapsed before play continues, the graph of unresolved moves is always
//! a forest; adding an edge whose endpoints are already connected is
//! exactly what closes a cycle.

use super::{MoveId, Position, QuantumMove};
use std::collections::VecDeque;
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edge {
    to: Position,
    id: MoveId,
}

/// Adjacency lists over the nine cells.
///
/// Neighbors are kept in insertion order, so traversal is deterministic for
/// a given move order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntanglementGraph {
    adjacency: [Vec<Edge>; 9],
}

impl EntanglementGraph {
    /// Creates a graph with no edges.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph from the unresolved moves in `moves`, in move order.
    #[instrument(skip(moves), fields(moves = moves.len()))]
    pub fn from_moves(moves: &[QuantumMove]) -> Self {
        let mut graph = Self::new();
        for mov in moves.iter().filter(|m| m.is_unresolved()) {
            graph.insert(mov);
        }
        graph
    }

    /// Adds a move's edge. Parallel edges are kept as distinct edges.
    pub fn insert(&mut self, mov: &QuantumMove) {
        let [a, b] = mov.cells();
        self.adjacency[a.to_index()].push(Edge { to: b, id: mov.id() });
        self.adjacency[b.to_index()].push(Edge { to: a, id: mov.id() });
    }

    /// Number of edges (unresolved moves) in the graph.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Breadth-first search for a path from `from` to `to`.
    ///
    /// Returns the ids of the edges along the path in walking order, or
    /// `None` if the cells are not connected. `from == to` yields an empty
    /// path.
    #[instrument(skip(self))]
    pub fn path(&self, from: Position, to: Position) -> Option<Vec<MoveId>> {
        let mut visited = [false; 9];
        let mut came_from: [Option<(Position, MoveId)>; 9] = [None; 9];
        let mut queue = VecDeque::from([from]);
        visited[from.to_index()] = true;

        while let Some(cell) = queue.pop_front() {
            if cell == to {
                let mut ids = Vec::new();
                let mut at = to;
                while let Some((prev, id)) = came_from[at.to_index()] {
                    ids.push(id);
                    at = prev;
                }
                ids.reverse();
                trace!(?ids, "path found");
                return Some(ids);
            }
            for edge in &self.adjacency[cell.to_index()] {
                if !visited[edge.to.to_index()] {
                    visited[edge.to.to_index()] = true;
                    came_from[edge.to.to_index()] = Some((cell, edge.id));
                    queue.push_back(edge.to);
                }
            }
        }
        None
    }

    /// Ids of every move in the connected component containing `cell`,
    /// sorted ascending.
    #[instrument(skip(self))]
    pub fn component(&self, cell: Position) -> Vec<MoveId> {
        let mut visited = [false; 9];
        let mut queue = VecDeque::from([cell]);
        let mut ids = Vec::new();
        visited[cell.to_index()] = true;

        while let Some(at) = queue.pop_front() {
            for edge in &self.adjacency[at.to_index()] {
                if !ids.contains(&edge.id) {
                    ids.push(edge.id);
                }
                if !visited[edge.to.to_index()] {
                    visited[edge.to.to_index()] = true;
                    queue.push_back(edge.to);
                }
            }
        }
        ids.sort();
        ids
    }
}

/// Checks whether adding `candidate` to the unresolved moves closes a cycle.
///
/// Returns the ids of the moves on the cycle, walking from `candidate`'s
/// first cell to its second along existing edges, with `candidate` last.
/// Returns an empty list if no cycle closes. `candidate` itself (matched by
/// id) and resolved moves are ignored when building the graph.
#[instrument(skip(moves, candidate), fields(candidate = %candidate))]
pub fn detect_cycle(moves: &[QuantumMove], candidate: &QuantumMove) -> Vec<MoveId> {
    let mut graph = EntanglementGraph::new();
    for mov in moves
        .iter()
        .filter(|m| m.is_unresolved() && m.id() != candidate.id())
    {
        graph.insert(mov);
    }

    let [a, b] = candidate.cells();
    match graph.path(a, b) {
        Some(mut cycle) => {
            cycle.push(candidate.id());
            debug!(?cycle, "cycle closed");
            cycle
        }
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Player;

    fn mv(id: u32, a: usize, b: usize) -> QuantumMove {
        let player = if id % 2 == 1 { Player::X } else { Player::O };
        QuantumMove::new(
            MoveId(id),
            player,
            Position::ALL[a],
            Position::ALL[b],
        )
    }

    #[test]
    fn test_no_cycle_on_tree() {
        let moves = vec![mv(1, 0, 1), mv(2, 1, 2)];
        assert!(detect_cycle(&moves, &mv(3, 2, 5)).is_empty());
    }

    #[test]
    fn test_triangle_closes() {
        let moves = vec![mv(1, 0, 1), mv(2, 1, 2)];
        let cycle = detect_cycle(&moves, &mv(3, 2, 0));
        assert_eq!(cycle, vec![MoveId(2), MoveId(1), MoveId(3)]);
    }

    #[test]
    fn test_parallel_edge_closes_two_cycle() {
        let moves = vec![mv(1, 3, 4)];
        let cycle = detect_cycle(&moves, &mv(2, 4, 3));
        assert_eq!(cycle, vec![MoveId(1), MoveId(2)]);
    }

    #[test]
    fn test_candidate_already_in_list_is_ignored() {
        let moves = vec![mv(1, 0, 1), mv(2, 1, 2), mv(3, 2, 0)];
        let cycle = detect_cycle(&moves, &moves[2]);
        assert_eq!(cycle, vec![MoveId(2), MoveId(1), MoveId(3)]);
    }

    #[test]
    fn test_resolved_moves_are_not_edges() {
        let mut first = mv(1, 0, 1);
        first.resolve_to(Position::TopLeft);
        let moves = vec![first];
        assert!(detect_cycle(&moves, &mv(2, 0, 1)).is_empty());
    }

    #[test]
    fn test_direction_does_not_change_cycle_members() {
        let moves = vec![mv(1, 0, 4), mv(2, 4, 8), mv(3, 8, 6)];
        let mut forward = detect_cycle(&moves, &mv(4, 0, 6));
        let mut backward = detect_cycle(&moves, &mv(4, 6, 0));
        forward.sort();
        backward.sort();
        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 4);
    }

    #[test]
    fn test_component_collects_connected_moves() {
        let moves = vec![mv(1, 0, 1), mv(2, 1, 2), mv(3, 6, 7)];
        let graph = EntanglementGraph::from_moves(&moves);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.component(Position::TopRight), vec![MoveId(1), MoveId(2)]);
        assert_eq!(graph.component(Position::BottomCenter), vec![MoveId(3)]);
        assert!(graph.component(Position::Center).is_empty());
    }
}

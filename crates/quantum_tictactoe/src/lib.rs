//! Quantum tic-tac-toe rules engine.
//!
//! Each turn places a ghost mark in two cells at once. Ghost moves are
//! edges of an entanglement graph over the nine cells; when a new move
//! closes a cycle, the opponent picks where the closing move lands and the
//! whole entangled group collapses into classical marks. Only classical
//! marks count toward the eight win lines.
//!
//! # Example
//!
//! ```
//! use quantum_tictactoe::{Player, Position, QuantumGame, Square};
//!
//! let mut game = QuantumGame::new();
//! game.submit_move(0, 1)?;
//! game.submit_move(1, 2)?;
//! let snapshot = game.submit_move(2, 0)?;
//! assert_eq!(*snapshot.pending().unwrap().chooser(), Player::O);
//!
//! game.apply_collapse_choice(2)?;
//! assert_eq!(game.board().get(Position::TopRight), Square::Occupied(Player::X));
//! # Ok::<(), quantum_tictactoe::SessionError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
pub mod collapse;
pub mod contracts;
pub mod entanglement;
mod error;
mod game;
pub mod invariants;
mod phases;
mod position;
pub mod rules;
mod snapshot;
mod types;

pub use action::{Command, MoveId, QuantumMove};
pub use collapse::{Collapse, CollapseReport, Step, resolve};
pub use entanglement::{EntanglementGraph, detect_cycle};
pub use error::{MoveBlock, PropagationConflict, ResolveError, SelectionFault, SessionError};
pub use game::QuantumGame;
pub use phases::{Outcome, PendingCollapse, Phase};
pub use position::Position;
pub use rules::evaluate;
pub use snapshot::GameSnapshot;
pub use types::{Board, Player, Square};

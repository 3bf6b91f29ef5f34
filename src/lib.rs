//! Quantum Games library - quantum tic-tac-toe with scripted replay
//!
//! The rules engine lives in the `quantum_tictactoe` crate and is
//! re-exported here. This crate adds TOML game scripts on top of it.
//!
//! # Architecture
//!
//! - **Engine**: entanglement graph, cycle detection, collapse propagation
//!   and the session state machine (`QuantumGame`)
//! - **Scripts**: TOML step lists replayed against a fresh session
//!
//! # Example
//!
//! ```
//! use quantum_games::{GameScript, Player};
//!
//! let script = GameScript::from_toml(r#"
//! [[steps]]
//! action = "move"
//! cells = [0, 1]
//! "#)?;
//! let run = script.run()?;
//! assert_eq!(*run.final_snapshot().to_move(), Player::O);
//! # Ok::<(), quantum_games::ScriptError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod script;

// Crate-level exports - Scripts
pub use script::{Expectation, ExpectedRejection, GameScript, ScriptError, ScriptRun, ScriptStep};

// Crate-level exports - Engine
pub use quantum_tictactoe::{
    Board, CollapseReport, Command, GameSnapshot, MoveBlock, MoveId, Outcome, PendingCollapse,
    Phase, Player, Position, PropagationConflict, QuantumGame, QuantumMove, SelectionFault,
    SessionError, Square,
};

//! The game session: turn order, pending collapses and terminal detection.
//!
//! This is the facade a presentation layer drives. Every command either
//! returns a fresh snapshot or a rejection; a rejected command leaves the
//! session untouched.

use super::collapse::{CollapseReport, resolve};
use super::contracts::{ChoiceContract, Contract, Selection, SubmitContract, enforce};
use super::entanglement::{EntanglementGraph, detect_cycle};
use super::error::{ResolveError, SessionError};
use super::phases::{Outcome, PendingCollapse, Phase};
use super::rules::evaluate;
use super::snapshot::GameSnapshot;
use super::{Board, Command, MoveId, Player, Position, QuantumMove};
use tracing::{debug, info, instrument, warn};

/// One quantum tic-tac-toe game.
///
/// Owns all game state; independent games share nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantumGame {
    pub(crate) board: Board,
    pub(crate) moves: Vec<QuantumMove>,
    pub(crate) to_move: Player,
    pub(crate) phase: Phase,
    pub(crate) last_collapse: Option<CollapseReport>,
}

impl QuantumGame {
    /// Creates a new game: empty board, X to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            moves: Vec::new(),
            to_move: Player::X,
            phase: Phase::AwaitingMove,
            last_collapse: None,
        }
    }

    /// Returns the classical board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns every move in turn order, resolved or not.
    pub fn moves(&self) -> &[QuantumMove] {
        &self.moves
    }

    /// Returns the player whose turn it is.
    ///
    /// While a collapse is pending this is still the player who closed the
    /// cycle; the chooser is recorded in the pending collapse.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Returns the current phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Returns the report of the most recent collapse.
    pub fn last_collapse(&self) -> Option<&CollapseReport> {
        self.last_collapse.as_ref()
    }

    /// Cells that may still appear in a move.
    pub fn open_cells(&self) -> Vec<Position> {
        self.board.open_positions()
    }

    /// Ids of the unresolved moves entangled with `id`, including itself.
    ///
    /// Empty if the move is unknown or already resolved.
    #[instrument(skip(self))]
    pub fn entangled_with(&self, id: MoveId) -> Vec<MoveId> {
        match self.moves.iter().find(|m| m.id() == id && m.is_unresolved()) {
            Some(mov) => EntanglementGraph::from_moves(&self.moves).component(mov.cells()[0]),
            None => Vec::new(),
        }
    }

    /// Builds a read-only snapshot of the session.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::new(
            self.board.clone(),
            self.moves.clone(),
            self.to_move,
            self.phase.clone(),
            self.last_collapse.clone(),
        )
    }

    fn next_id(&self) -> MoveId {
        self.moves
            .last()
            .map_or(MoveId::FIRST, |last| last.id().next())
    }

    /// Proposes a quantum move across cells `a` and `b` for the player to
    /// move.
    ///
    /// If the move closes a cycle the session waits for a collapse choice
    /// and the turn does not advance.
    ///
    /// # Errors
    ///
    /// - `IllegalStateForMove` if the game is over or a collapse is pending
    /// - `InvalidSelection` if the cells are equal, off the board or classical
    #[instrument(skip(self), fields(player = %self.to_move))]
    pub fn submit_move(&mut self, a: usize, b: usize) -> Result<GameSnapshot, SessionError> {
        let (a, b) = SubmitContract::pre(self, &Selection { a, b })
            .inspect_err(|e| warn!(error = %e, "move rejected"))?;

        #[cfg(debug_assertions)]
        let before = self.clone();

        let player = self.to_move;
        let id = self.next_id();
        let mov = QuantumMove::new(id, player, a, b);
        let cycle = detect_cycle(&self.moves, &mov);
        self.moves.push(mov);

        if cycle.is_empty() {
            info!(%mov, "quantum move placed");
            self.to_move = player.opponent();
            self.settle();
        } else {
            let chooser = player.opponent();
            info!(%mov, ?cycle, %chooser, "cycle closed; collapse pending");
            self.phase = Phase::PendingCollapse(PendingCollapse::new(cycle, id, [a, b], chooser));
        }

        #[cfg(debug_assertions)]
        enforce(SubmitContract::post(&before, self));

        Ok(self.snapshot())
    }

    /// Collapses the pending cycle by placing the closer on `cell`.
    ///
    /// Every move entangled with the closer is forced in turn. Unless the
    /// collapse ends the game, the turn then passes to the chooser.
    ///
    /// # Errors
    ///
    /// - `IllegalStateForChoice` if no collapse is pending
    /// - `InvalidChoice` if `cell` is not one of the closer's cells
    #[instrument(skip(self))]
    pub fn apply_collapse_choice(&mut self, cell: usize) -> Result<GameSnapshot, SessionError> {
        let (closer, chosen) = ChoiceContract::pre(self, &cell)
            .inspect_err(|e| warn!(error = %e, "collapse choice rejected"))?;
        let (chooser, candidates) = match &self.phase {
            Phase::PendingCollapse(pending) => (*pending.chooser(), *pending.candidates()),
            _ => return Err(SessionError::IllegalStateForChoice),
        };

        #[cfg(debug_assertions)]
        let before = self.clone();

        let report = resolve(&mut self.moves, &mut self.board, closer, chosen).map_err(|e| {
            warn!(error = %e, "collapse failed its own preconditions");
            match e {
                ResolveError::NotAnEndpoint { .. } => SessionError::InvalidChoice {
                    chosen: cell,
                    candidates,
                },
                ResolveError::UnknownMove(_) | ResolveError::AlreadyResolved(_) => {
                    SessionError::IllegalStateForChoice
                }
            }
        })?;

        info!(
            %closer,
            %chosen,
            resolved = report.resolved().len(),
            conflicts = report.conflicts().len(),
            "collapse applied"
        );
        self.last_collapse = Some(report);
        self.phase = Phase::AwaitingMove;
        self.settle();
        if !self.phase.is_terminal() {
            self.to_move = chooser;
        }

        #[cfg(debug_assertions)]
        enforce(ChoiceContract::post(&before, self));

        Ok(self.snapshot())
    }

    /// Returns to the initial empty state from any phase.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> GameSnapshot {
        info!(moves = self.moves.len(), "game reset");
        *self = Self::new();
        self.snapshot()
    }

    /// Applies a presentation-layer command.
    pub fn apply(&mut self, command: Command) -> Result<GameSnapshot, SessionError> {
        match command {
            Command::Submit { a, b } => self.submit_move(a, b),
            Command::Collapse { cell } => self.apply_collapse_choice(cell),
            Command::Reset => Ok(self.reset()),
        }
    }

    /// Rebuilds a game from a command log.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first rejection.
    #[instrument(skip(commands), fields(commands = commands.len()))]
    pub fn replay(commands: &[Command]) -> Result<Self, SessionError> {
        let mut game = Self::new();
        for command in commands {
            game.apply(*command)?;
        }
        debug!(moves = game.moves.len(), "replay complete");
        Ok(game)
    }

    /// Enters the terminal phase if the board is decided.
    ///
    /// Besides a completed line or a full board, a board with fewer than two
    /// quantum cells is a draw: no further move can be proposed.
    fn settle(&mut self) {
        let outcome = evaluate(&self.board)
            .or_else(|| (self.board.open_positions().len() < 2).then_some(Outcome::Draw));
        if let Some(outcome) = outcome {
            info!(%outcome, "game over");
            self.phase = Phase::Terminal(outcome);
        }
    }
}

impl Default for QuantumGame {
    fn default() -> Self {
        Self::new()
    }
}

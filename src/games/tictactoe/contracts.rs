//! Contract-based move validation for tic-tac-toe.
//!
//! Each precondition is its own check so that callers (and tests) can
//! reason about them separately; [`LegalMove`] composes them.

use super::action::MoveError;
use super::{Board, GameResult};
use tracing::{instrument, warn};

/// Read access to the state a move is validated against.
pub trait MoveContext {
    /// The current board.
    fn board(&self) -> &Board;

    /// The current result of the board.
    fn result(&self) -> GameResult;
}

impl MoveContext for (Board, GameResult) {
    fn board(&self) -> &Board {
        &self.0
    }

    fn result(&self) -> GameResult {
        self.1
    }
}

/// Precondition: The index must name one of the nine squares.
pub struct InRange;

impl InRange {
    /// Checks the index bound.
    pub fn check(index: usize) -> Result<(), MoveError> {
        if index < Board::SIZE {
            Ok(())
        } else {
            Err(MoveError::OutOfRange(index))
        }
    }
}

/// Precondition: The square at the move's index must be empty.
pub struct SquareIsEmpty;

impl SquareIsEmpty {
    /// Checks that the target square is free.
    pub fn check(board: &Board, index: usize) -> Result<(), MoveError> {
        if board.is_empty(index) {
            Ok(())
        } else {
            Err(MoveError::CellOccupied(index))
        }
    }
}

/// Precondition: The game must still be in progress.
pub struct GameNotOver;

impl GameNotOver {
    /// Checks that no result has been reached yet.
    pub fn check(result: GameResult) -> Result<(), MoveError> {
        if result.is_finished() {
            Err(MoveError::GameOver(result))
        } else {
            Ok(())
        }
    }
}

/// Composite precondition: in range, on an empty square, while the game is on.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move. Never mutates the context.
    #[instrument(skip(ctx))]
    pub fn check<C: MoveContext + ?Sized>(ctx: &C, index: usize) -> Result<(), MoveError> {
        let outcome = InRange::check(index)
            .and_then(|()| SquareIsEmpty::check(ctx.board(), index))
            .and_then(|()| GameNotOver::check(ctx.result()));
        if let Err(e) = &outcome {
            warn!(index, error = %e, "Move rejected");
        }
        outcome
    }
}

/// Validates a move against the given state.
pub fn validate<C: MoveContext + ?Sized>(ctx: &C, index: usize) -> Result<(), MoveError> {
    LegalMove::check(ctx, index)
}

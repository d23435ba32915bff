//! Computer opponents.
//!
//! Three interchangeable strategies share the rule engine:
//!
//! - [`RandomMove`] (Easy): uniform choice over empty squares
//! - [`Heuristic`] (Medium): take a win, else block, else random
//! - [`Minimax`] (Hard): exhaustive search, never loses

mod heuristic;
mod minimax;
mod random;

pub use heuristic::{Heuristic, completing_move};
pub use minimax::{Minimax, WIN_SCORE};
pub use random::RandomMove;

use crate::games::tictactoe::{Board, Player};
use derive_more::{Display, Error};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Game mode: two humans, or a human against one of three computer tiers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Difficulty {
    /// Two humans share the board; no computer moves.
    TwoPlayer,
    /// Random computer moves.
    Easy,
    /// Wins or blocks when it can, otherwise random.
    Medium,
    /// Perfect play.
    Hard,
}

impl Difficulty {
    /// The computer strategy for this mode, or `None` for two humans.
    pub fn strategy(self) -> Option<&'static dyn MoveSelector> {
        match self {
            Difficulty::TwoPlayer => None,
            Difficulty::Easy => Some(&RandomMove),
            Difficulty::Medium => Some(&Heuristic),
            Difficulty::Hard => Some(&Minimax),
        }
    }

    /// True when a computer plays the second seat.
    pub fn has_computer(self) -> bool {
        self.strategy().is_some()
    }
}

/// Errors from the computer opponents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum AiError {
    /// Asked to move on a board with no empty square.
    #[display("No legal move: the board is full")]
    NoLegalMove,

    /// Asked to move in a two-player game.
    #[display("Two-player mode has no computer opponent")]
    NoComputerOpponent,
}

/// A move-selection strategy.
pub trait MoveSelector: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Picks an empty index for `ai_player` to mark.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::NoLegalMove`] if the board is full.
    fn select(
        &self,
        board: &Board,
        ai_player: Player,
        rng: &mut dyn RngCore,
    ) -> Result<usize, AiError>;
}

/// Asks the strategy for `difficulty` to move for `ai_player`.
#[instrument(skip(board, rng), fields(empty = board.empty_indices().len()))]
pub fn select_move(
    board: &Board,
    ai_player: Player,
    difficulty: Difficulty,
    rng: &mut dyn RngCore,
) -> Result<usize, AiError> {
    let strategy = difficulty.strategy().ok_or(AiError::NoComputerOpponent)?;
    let index = strategy.select(board, ai_player, rng)?;
    debug!(strategy = strategy.name(), index, "Computer chose move");
    Ok(index)
}

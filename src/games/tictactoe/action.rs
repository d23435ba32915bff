//! Move rejection reasons for tic-tac-toe.
//!
//! A rejected move leaves the session untouched; these errors tell the
//! caller why.

use super::GameResult;
use serde::{Deserialize, Serialize};

/// Why a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum MoveError {
    /// The index is not a board cell.
    #[display("Position {} is out of range (must be 0-8)", _0)]
    OutOfRange(usize),

    /// The square at the index is already occupied.
    #[display("Square {} is already occupied", _0)]
    CellOccupied(usize),

    /// The game is already over.
    #[display("Game is already over ({})", _0)]
    GameOver(GameResult),
}

impl std::error::Error for MoveError {}

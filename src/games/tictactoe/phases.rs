//! Result of evaluating a board.

use super::Player;
use serde::{Deserialize, Serialize};

/// Result of a board: still being played, won, or drawn.
///
/// Always derived from a board by [`evaluate`](super::rules::evaluate);
/// a session keeps it in step with its board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GameResult {
    /// Game is ongoing.
    #[default]
    InProgress,
    /// Player completed a line.
    Won(Player),
    /// Board is full with no complete line.
    Draw,
}

impl GameResult {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameResult::Won(player) => Some(*player),
            GameResult::InProgress | GameResult::Draw => None,
        }
    }

    /// Returns true once the game has ended.
    pub fn is_finished(&self) -> bool {
        !matches!(self, GameResult::InProgress)
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::InProgress => write!(f, "In progress"),
            GameResult::Won(player) => write!(f, "Player {} wins", player),
            GameResult::Draw => write!(f, "Draw"),
        }
    }
}

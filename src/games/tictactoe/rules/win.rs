//! Win detection logic for tic-tac-toe.

use super::super::{Board, GameResult, Player, Square};
use super::draw::is_full;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One of the eight index triples that wins when uniformly marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinPattern([usize; 3]);

impl WinPattern {
    /// All winning lines in scan order: rows, columns, diagonals.
    pub const ALL: [WinPattern; 8] = [
        // Rows
        WinPattern([0, 1, 2]),
        WinPattern([3, 4, 5]),
        WinPattern([6, 7, 8]),
        // Columns
        WinPattern([0, 3, 6]),
        WinPattern([1, 4, 7]),
        WinPattern([2, 5, 8]),
        // Diagonals
        WinPattern([0, 4, 8]),
        WinPattern([2, 4, 6]),
    ];

    /// The three board indices of this line.
    pub fn cells(&self) -> [usize; 3] {
        self.0
    }

    /// The squares this line covers on `board`.
    pub fn squares(&self, board: &Board) -> [Square; 3] {
        self.0.map(|i| board.get(i).unwrap_or_default())
    }

    /// Returns the player holding all three cells, if any.
    pub fn owner(&self, board: &Board) -> Option<Player> {
        match self.squares(board) {
            [Square::Occupied(a), Square::Occupied(b), Square::Occupied(c)] if a == b && b == c => {
                Some(a)
            }
            _ => None,
        }
    }
}

/// Checks if there is a winner on the board.
///
/// Returns the first complete line in [`WinPattern::ALL`] order together with
/// its owner.
#[instrument(level = "trace")]
pub fn check_winner(board: &Board) -> Option<(Player, WinPattern)> {
    WinPattern::ALL
        .iter()
        .find_map(|pattern| pattern.owner(board).map(|player| (player, *pattern)))
}

/// Evaluates a board into its result and the winning line, if any.
///
/// Pure: the board is only read.
#[instrument(level = "trace")]
pub fn evaluate(board: &Board) -> (GameResult, Option<WinPattern>) {
    if let Some((player, pattern)) = check_winner(board) {
        return (GameResult::Won(player), Some(pattern));
    }
    if is_full(board) {
        (GameResult::Draw, None)
    } else {
        (GameResult::InProgress, None)
    }
}

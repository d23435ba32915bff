//! Medium tier: one-ply win/block heuristic.
//!
//! Weaker than perfect play: with no two-in-a-row on the board
//! it falls straight back to a random square instead of preferring the
//! center or corners.

use super::{AiError, MoveSelector, RandomMove};
use crate::games::tictactoe::{Board, Player, Square, WinPattern};
use rand::RngCore;
use tracing::{debug, instrument};

/// Takes a win, else blocks the opponent's win, else plays randomly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Heuristic;

/// Finds the empty cell that would complete a line for `player`.
///
/// Scans [`WinPattern::ALL`] in order and returns the first line holding
/// exactly two of `player`'s marks and one empty square.
#[instrument(level = "trace")]
pub fn completing_move(board: &Board, player: Player) -> Option<usize> {
    WinPattern::ALL.iter().find_map(|pattern| {
        let cells = pattern.cells();
        let marked = cells
            .iter()
            .filter(|&&i| board.get(i) == Some(Square::Occupied(player)))
            .count();
        let empty = cells.iter().copied().find(|&i| board.is_empty(i));
        if marked == 2 { empty } else { None }
    })
}

impl MoveSelector for Heuristic {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn select(
        &self,
        board: &Board,
        ai_player: Player,
        rng: &mut dyn RngCore,
    ) -> Result<usize, AiError> {
        if let Some(index) = completing_move(board, ai_player) {
            debug!(index, "Taking the win");
            return Ok(index);
        }
        if let Some(index) = completing_move(board, ai_player.opponent()) {
            debug!(index, "Blocking opponent");
            return Ok(index);
        }
        RandomMove::pick(board, rng)
    }
}

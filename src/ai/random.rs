//! Easy tier: uniform random choice.

use super::{AiError, MoveSelector};
use crate::games::tictactoe::{Board, Player};
use rand::RngCore;
use rand::seq::SliceRandom;

/// Picks any empty square with equal probability. No look-ahead.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomMove;

impl RandomMove {
    /// Uniform choice over the empty indices of `board`.
    pub fn pick(board: &Board, rng: &mut dyn RngCore) -> Result<usize, AiError> {
        board
            .empty_indices()
            .choose(rng)
            .copied()
            .ok_or(AiError::NoLegalMove)
    }
}

impl MoveSelector for RandomMove {
    fn name(&self) -> &'static str {
        "random"
    }

    fn select(
        &self,
        board: &Board,
        _ai_player: Player,
        rng: &mut dyn RngCore,
    ) -> Result<usize, AiError> {
        Self::pick(board, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn test_only_empty_squares_chosen() {
        let board = Board::new()
            .with_mark(0, Player::X)
            .with_mark(4, Player::O)
            .with_mark(8, Player::X);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let index = RandomMove.select(&board, Player::O, &mut rng).unwrap();
            assert!(board.is_empty(index));
        }
    }

    #[test]
    fn test_every_empty_square_reachable() {
        let board = Board::new().with_mark(4, Player::X);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let seen: HashSet<usize> = (0..500)
            .map(|_| RandomMove::pick(&board, &mut rng).unwrap())
            .collect();
        assert_eq!(seen.len(), 8);
        assert!(!seen.contains(&4));
    }
}

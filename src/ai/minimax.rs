//! Hard tier: exhaustive minimax search.
//!
//! The full game tree from any position is at most 9! leaves, so the search
//! always runs to the end. Alpha-beta cut-offs only skip branches that can
//! not beat the move already held at the root; the chosen move is the same
//! one plain minimax would choose.

use super::{AiError, MoveSelector};
use crate::games::tictactoe::{Board, GameResult, Player, evaluate};
use rand::RngCore;
use tracing::{debug, instrument};

/// Score of a win reached on the very next ply. Each further ply costs one
/// point, so quicker wins and slower losses are preferred.
pub const WIN_SCORE: i32 = 10;

/// Perfect play: never loses, and wins whenever a forced win exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct Minimax;

impl Minimax {
    /// Best index for `ai_player`; ties go to the lowest index.
    #[instrument(skip(board), fields(empty = board.empty_indices().len()))]
    pub fn best_move(board: &Board, ai_player: Player) -> Result<usize, AiError> {
        let mut best: Option<(usize, i32)> = None;

        for index in board.empty_indices() {
            let alpha = best.map_or(i32::MIN, |(_, score)| score);
            let child = board.with_mark(index, ai_player);
            let score = search(&child, 1, false, ai_player, alpha, i32::MAX);
            if best.is_none_or(|(_, held)| score > held) {
                best = Some((index, score));
            }
        }

        let (index, score) = best.ok_or(AiError::NoLegalMove)?;
        debug!(index, score, "Minimax selected move");
        Ok(index)
    }
}

/// Scores `board` from `ai_player`'s point of view.
///
/// `depth` counts plies made since the search root. Returns a value in
/// `(alpha, beta)` exactly; outside the window it returns a bound.
fn search(
    board: &Board,
    depth: i32,
    maximizing: bool,
    ai_player: Player,
    mut alpha: i32,
    mut beta: i32,
) -> i32 {
    match evaluate(board).0 {
        GameResult::Won(winner) if winner == ai_player => return WIN_SCORE - depth,
        GameResult::Won(_) => return depth - WIN_SCORE,
        GameResult::Draw => return 0,
        GameResult::InProgress => {}
    }

    if maximizing {
        let mut best = i32::MIN;
        for index in board.empty_indices() {
            let child = board.with_mark(index, ai_player);
            best = best.max(search(&child, depth + 1, false, ai_player, alpha, beta));
            alpha = alpha.max(best);
            if alpha >= beta {
                break;
            }
        }
        best
    } else {
        let mut best = i32::MAX;
        for index in board.empty_indices() {
            let child = board.with_mark(index, ai_player.opponent());
            best = best.min(search(&child, depth + 1, true, ai_player, alpha, beta));
            beta = beta.min(best);
            if alpha >= beta {
                break;
            }
        }
        best
    }
}

impl MoveSelector for Minimax {
    fn name(&self) -> &'static str {
        "minimax"
    }

    fn select(
        &self,
        board: &Board,
        ai_player: Player,
        _rng: &mut dyn RngCore,
    ) -> Result<usize, AiError> {
        Self::best_move(board, ai_player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unpruned minimax, for checking that pruning never changes the move.
    fn full_score(board: &Board, depth: i32, maximizing: bool, ai: Player) -> i32 {
        match evaluate(board).0 {
            GameResult::Won(w) if w == ai => return WIN_SCORE - depth,
            GameResult::Won(_) => return depth - WIN_SCORE,
            GameResult::Draw => return 0,
            GameResult::InProgress => {}
        }
        let mover = if maximizing { ai } else { ai.opponent() };
        let scores = board
            .empty_indices()
            .into_iter()
            .map(|i| full_score(&board.with_mark(i, mover), depth + 1, !maximizing, ai));
        if maximizing {
            scores.max().unwrap()
        } else {
            scores.min().unwrap()
        }
    }

    fn full_best(board: &Board, ai: Player) -> usize {
        let mut best: Option<(usize, i32)> = None;
        for i in board.empty_indices() {
            let s = full_score(&board.with_mark(i, ai), 1, false, ai);
            if best.is_none_or(|(_, b)| s > b) {
                best = Some((i, s));
            }
        }
        best.unwrap().0
    }

    fn board_of(marks: &[(usize, Player)]) -> Board {
        marks
            .iter()
            .fold(Board::new(), |b, &(i, p)| b.with_mark(i, p))
    }

    #[test]
    fn test_takes_immediate_win() {
        // O O _ / X X _ / X _ _
        let board = board_of(&[
            (0, Player::O),
            (1, Player::O),
            (3, Player::X),
            (4, Player::X),
            (6, Player::X),
        ]);
        assert_eq!(Minimax::best_move(&board, Player::O), Ok(2));
    }

    #[test]
    fn test_blocks_forced_loss() {
        // X X _ / _ O _ / _ _ _
        let board = board_of(&[(0, Player::X), (1, Player::X), (4, Player::O)]);
        assert_eq!(Minimax::best_move(&board, Player::O), Ok(2));
    }

    #[test]
    fn test_prefers_faster_win() {
        // O can win now at 2; other lines also win later.
        let board = board_of(&[
            (0, Player::O),
            (1, Player::O),
            (4, Player::O),
            (3, Player::X),
            (5, Player::X),
            (7, Player::X),
        ]);
        let index = Minimax::best_move(&board, Player::O).unwrap();
        let (result, _) = evaluate(&board.with_mark(index, Player::O));
        assert_eq!(result, GameResult::Won(Player::O));
    }

    #[test]
    fn test_pruning_matches_plain_search() {
        let positions = [
            board_of(&[(0, Player::X)]),
            board_of(&[(4, Player::X)]),
            board_of(&[(0, Player::X), (4, Player::O), (8, Player::X)]),
            board_of(&[(1, Player::X), (3, Player::O), (5, Player::X)]),
            board_of(&[(0, Player::X), (1, Player::X), (3, Player::O), (4, Player::O)]),
        ];
        for board in positions {
            let ai = if board.occupied_count() % 2 == 0 {
                Player::X
            } else {
                Player::O
            };
            assert_eq!(Minimax::best_move(&board, ai), Ok(full_best(&board, ai)), "{board}");
        }
    }
}

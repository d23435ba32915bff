//! Computer-versus-computer games.

use crate::ai::{self, AiError, Difficulty};
use crate::games::tictactoe::{Board, GameResult, Player, evaluate};
use crate::score::{Score, ScoreTracker};
use rand::RngCore;
use tracing::{debug, info, instrument};

/// Plays one game from an empty board, X using `first` and O using `second`.
///
/// Returns the result and the indices played, in order.
///
/// # Errors
///
/// [`AiError::NoComputerOpponent`] if either side is
/// [`Difficulty::TwoPlayer`].
#[instrument(skip(rng))]
pub fn play_game(
    first: Difficulty,
    second: Difficulty,
    rng: &mut dyn RngCore,
) -> Result<(GameResult, Vec<usize>), AiError> {
    let mut board = Board::new();
    let mut to_play = Player::X;
    let mut moves = Vec::with_capacity(Board::SIZE);

    loop {
        let (result, _) = evaluate(&board);
        if result.is_finished() {
            debug!(%result, ?moves, "Game finished");
            return Ok((result, moves));
        }
        let difficulty = match to_play {
            Player::X => first,
            Player::O => second,
        };
        let index = ai::select_move(&board, to_play, difficulty, rng)?;
        board.place(index, to_play);
        moves.push(index);
        to_play = to_play.opponent();
    }
}

/// Plays `games` games and tallies the outcomes.
#[instrument(skip(rng))]
pub fn play_series(
    first: Difficulty,
    second: Difficulty,
    games: u32,
    rng: &mut dyn RngCore,
) -> Result<Score, AiError> {
    let mut tracker = ScoreTracker::new();
    for _ in 0..games {
        let (result, _) = play_game(first, second, rng)?;
        tracker.record(result);
    }
    let score = tracker.score();
    info!(%score, "Series finished");
    Ok(score)
}

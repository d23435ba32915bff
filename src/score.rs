//! Outcome tally across games.

use crate::games::tictactoe::{GameResult, Player};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Win/draw counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters, Serialize, Deserialize)]
pub struct Score {
    /// Games won by X.
    first_wins: u32,
    /// Games won by O.
    second_wins: u32,
    /// Drawn games.
    draws: u32,
}

impl Score {
    /// Total finished games counted.
    pub fn games(&self) -> u32 {
        self.first_wins + self.second_wins + self.draws
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "X: {}  Draws: {}  O: {}",
            self.first_wins, self.draws, self.second_wins
        )
    }
}

/// Accumulates outcomes until explicitly reset.
///
/// Counters only grow; [`reset`](ScoreTracker::reset) is the one way back
/// to zero.
#[derive(Debug, Clone, Default)]
pub struct ScoreTracker {
    score: Score,
}

impl ScoreTracker {
    /// Creates a tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counters.
    pub fn score(&self) -> Score {
        self.score
    }

    /// Counts one finished game. Returns `false` for an unfinished result,
    /// which is not counted.
    #[instrument(skip(self))]
    pub fn record(&mut self, result: GameResult) -> bool {
        match result {
            GameResult::Won(Player::X) => self.score.first_wins += 1,
            GameResult::Won(Player::O) => self.score.second_wins += 1,
            GameResult::Draw => self.score.draws += 1,
            GameResult::InProgress => return false,
        }
        info!(score = %self.score, "Score updated");
        true
    }

    /// Zeroes every counter.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.score = Score::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_each_outcome() {
        let mut tracker = ScoreTracker::new();
        assert!(tracker.record(GameResult::Won(Player::X)));
        assert!(tracker.record(GameResult::Won(Player::O)));
        assert!(tracker.record(GameResult::Won(Player::O)));
        assert!(tracker.record(GameResult::Draw));

        let score = tracker.score();
        assert_eq!(*score.first_wins(), 1);
        assert_eq!(*score.second_wins(), 2);
        assert_eq!(*score.draws(), 1);
        assert_eq!(score.games(), 4);
    }

    #[test]
    fn test_in_progress_not_counted() {
        let mut tracker = ScoreTracker::new();
        assert!(!tracker.record(GameResult::InProgress));
        assert_eq!(tracker.score(), Score::default());
    }

    #[test]
    fn test_reset_zeroes() {
        let mut tracker = ScoreTracker::new();
        tracker.record(GameResult::Draw);
        tracker.reset();
        assert_eq!(tracker.score().games(), 0);
    }
}

//! Turn state machine for a table of tic-tac-toe.
//!
//! A [`GameSession`] owns the board, whose turn it is, the result, the
//! winning line, the score and the chosen [`Difficulty`]. Every transition
//! goes through [`GameSession::submit_move`], [`GameSession::fire_computer_turn`],
//! [`GameSession::play_again`] or [`GameSession::reset_all`], and each one
//! notifies subscribers so a front end can re-read the query surface.
//!
//! The computer always plays O. Reaching O's turn against a computer hands
//! out a [`ComputerTurn`] ticket. With [`Pacing::Immediate`] the ticket is
//! redeemed inside the same call; with [`Pacing::Deferred`] the owner redeems
//! it later (see [`crate::pacing`]). A ticket only redeems while it is the
//! session's pending ticket, so resets and human moves invalidate it.

use crate::ai::{self, AiError, Difficulty};
use crate::config::EngineConfig;
use crate::games::tictactoe::{
    Board, GameResult, MoveContext, MoveError, Player, WinPattern, evaluate, validate,
};
use crate::score::{Score, ScoreTracker};
use derive_getters::Getters;
use derive_more::{Display, Error};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// The seat the computer plays.
pub const COMPUTER: Player = Player::O;

/// When the computer's reply is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pacing {
    /// Inside the call that made it the computer's turn.
    #[default]
    Immediate,
    /// Later, when the owner redeems the pending [`ComputerTurn`].
    Deferred,
}

/// Claim on one computer reply, valid for one board state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Getters, Serialize, Deserialize)]
pub struct ComputerTurn {
    /// Session generation when the ticket was issued.
    generation: u64,
    /// Marks on the board when the ticket was issued.
    ply: usize,
}

/// Where the state machine stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Waiting for `Player` to move.
    AwaitingMove(Player),
    /// The game ended with this result.
    Finished(GameResult),
}

/// Notification sent to subscribers after a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A difficulty was chosen; a session now exists.
    DifficultyChosen(Difficulty),
    /// A mark was placed.
    MoveApplied {
        /// Who moved.
        player: Player,
        /// Where.
        index: usize,
    },
    /// The board's result changed.
    ResultChanged {
        /// New result.
        result: GameResult,
        /// Completed line, for a win.
        winning_pattern: Option<WinPattern>,
    },
    /// The tally changed.
    ScoreChanged(Score),
    /// The computer is about to move.
    ComputerThinking(ComputerTurn),
    /// The computer moved.
    ComputerResolved {
        /// Where the computer played.
        index: usize,
    },
    /// A pending computer move was dropped.
    ComputerCancelled(ComputerTurn),
    /// Board, turn and result were cleared; score kept.
    BoardReset,
    /// Everything was cleared, including score and difficulty.
    SessionCleared,
}

/// Errors surfaced by session commands.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// The move failed validation.
    #[display("Rejected move: {}", _0)]
    Rejected(MoveError),

    /// A difficulty was already chosen and no reset was issued.
    #[display("Cannot choose {}: a difficulty is already set, reset first", _0)]
    InvalidDifficulty(#[error(not(source))] Difficulty),

    /// No difficulty has been chosen yet.
    #[display("No game in progress: choose a difficulty first")]
    NoSession,

    /// The computer opponent failed.
    #[display("Computer opponent failed: {}", _0)]
    Ai(AiError),

    /// The task driving the session has stopped.
    #[display("Session driver has shut down")]
    DriverClosed,
}

impl From<MoveError> for SessionError {
    fn from(err: MoveError) -> Self {
        Self::Rejected(err)
    }
}

impl From<AiError> for SessionError {
    fn from(err: AiError) -> Self {
        Self::Ai(err)
    }
}

/// Everything a front end reads, in one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// The board.
    pub board: Board,
    /// Player to move (meaningless once finished).
    pub to_play: Player,
    /// Result of the board.
    pub result: GameResult,
    /// Completed line, for a win.
    pub winning_pattern: Option<WinPattern>,
    /// Tally across games.
    pub score: Score,
    /// Chosen mode, if a session exists.
    pub difficulty: Option<Difficulty>,
    /// Reset counter.
    pub generation: u64,
    /// Computer move waiting to be applied.
    pub pending: Option<ComputerTurn>,
}

impl MoveContext for SessionSnapshot {
    fn board(&self) -> &Board {
        &self.board
    }

    fn result(&self) -> GameResult {
        self.result
    }
}

/// A table of tic-tac-toe and its score.
#[derive(Debug)]
pub struct GameSession {
    board: Board,
    to_play: Player,
    result: GameResult,
    winning_pattern: Option<WinPattern>,
    scores: ScoreTracker,
    difficulty: Option<Difficulty>,
    generation: u64,
    pending: Option<ComputerTurn>,
    pacing: Pacing,
    rng: ChaCha8Rng,
    subscribers: Vec<mpsc::UnboundedSender<SessionEvent>>,
}

impl GameSession {
    /// Creates a table with no difficulty chosen, seeded from entropy.
    #[instrument]
    pub fn new(pacing: Pacing) -> Self {
        Self::with_rng(pacing, ChaCha8Rng::from_entropy())
    }

    /// Creates a table whose random choices are reproducible.
    #[instrument]
    pub fn with_seed(pacing: Pacing, seed: u64) -> Self {
        Self::with_rng(pacing, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates a table from configuration: deferred pacing when a thinking
    /// delay is set, seeded when a seed is set.
    #[instrument(skip(config))]
    pub fn from_config(config: &EngineConfig) -> Self {
        let pacing = if config.think_delay().is_zero() {
            Pacing::Immediate
        } else {
            Pacing::Deferred
        };
        match config.seed() {
            Some(seed) => Self::with_seed(pacing, *seed),
            None => Self::new(pacing),
        }
    }

    fn with_rng(pacing: Pacing, rng: ChaCha8Rng) -> Self {
        info!(?pacing, "Creating game session");
        Self {
            board: Board::new(),
            to_play: Player::X,
            result: GameResult::InProgress,
            winning_pattern: None,
            scores: ScoreTracker::new(),
            difficulty: None,
            generation: 0,
            pending: None,
            pacing,
            rng,
            subscribers: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Queries
    // ─────────────────────────────────────────────────────────────

    /// The current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Player to move. Meaningless once the game is finished.
    pub fn to_play(&self) -> Player {
        self.to_play
    }

    /// Result of the current board.
    pub fn result(&self) -> GameResult {
        self.result
    }

    /// The completed line, for a won game.
    pub fn winning_pattern(&self) -> Option<WinPattern> {
        self.winning_pattern
    }

    /// Tally across games since the last full reset.
    pub fn score(&self) -> Score {
        self.scores.score()
    }

    /// Chosen mode, or `None` before a difficulty is chosen.
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// Reset counter; bumped by every reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// How computer replies are applied.
    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// The computer move waiting to be applied, if any.
    pub fn pending_computer_turn(&self) -> Option<ComputerTurn> {
        self.pending
    }

    /// Current state machine state.
    pub fn state(&self) -> SessionState {
        if self.result.is_finished() {
            SessionState::Finished(self.result)
        } else {
            SessionState::AwaitingMove(self.to_play)
        }
    }

    /// All query values at once.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.board,
            to_play: self.to_play,
            result: self.result,
            winning_pattern: self.winning_pattern,
            score: self.score(),
            difficulty: self.difficulty,
            generation: self.generation,
            pending: self.pending,
        }
    }

    /// Registers a listener for [`SessionEvent`]s.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    // ─────────────────────────────────────────────────────────────
    //  Commands
    // ─────────────────────────────────────────────────────────────

    /// Starts a session in the given mode.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidDifficulty`] if a difficulty is already set.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn choose_difficulty(&mut self, difficulty: Difficulty) -> Result<(), SessionError> {
        if let Some(current) = self.difficulty {
            warn!(?current, "Difficulty already chosen");
            return Err(SessionError::InvalidDifficulty(difficulty));
        }
        self.difficulty = Some(difficulty);
        info!("Difficulty chosen");
        self.emit(SessionEvent::DifficultyChosen(difficulty));
        self.request_computer_turn()
    }

    /// Places the mark of the player to move at `index`.
    ///
    /// A move submitted while a computer reply is pending pre-empts it: the
    /// pending ticket is dropped and the move is played for O.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoSession`] before a difficulty is chosen,
    /// [`SessionError::Rejected`] if the move is illegal. The session is
    /// unchanged in both cases.
    #[instrument(skip(self), fields(generation = self.generation, to_play = %self.to_play))]
    pub fn submit_move(&mut self, index: usize) -> Result<(), SessionError> {
        if self.difficulty.is_none() {
            warn!("Move before a difficulty was chosen");
            return Err(SessionError::NoSession);
        }
        validate(&*self, index)?;

        if let Some(ticket) = self.pending.take() {
            info!(?ticket, "Move pre-empts pending computer turn");
            self.emit(SessionEvent::ComputerCancelled(ticket));
        }

        self.apply(index);
        self.request_computer_turn()
    }

    /// Applies the computer's move for `ticket`.
    ///
    /// Returns `Ok(None)` without touching the session when the ticket is no
    /// longer the pending one (a reset or a human move got there first).
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn fire_computer_turn(
        &mut self,
        ticket: ComputerTurn,
    ) -> Result<Option<usize>, SessionError> {
        if !self.is_current(ticket) {
            warn!(?ticket, pending = ?self.pending, "Ignoring stale computer turn");
            return Ok(None);
        }
        let difficulty = self.difficulty.ok_or(SessionError::NoSession)?;
        self.pending = None;

        let index = ai::select_move(&self.board, COMPUTER, difficulty, &mut self.rng)?;
        validate(&*self, index)?;

        self.apply(index);
        self.emit(SessionEvent::ComputerResolved { index });
        self.request_computer_turn()?;
        Ok(Some(index))
    }

    /// Clears the board for a new game; score and difficulty stay.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn play_again(&mut self) {
        self.generation += 1;
        if let Some(ticket) = self.pending.take() {
            debug!(?ticket, "Cancelling computer turn on reset");
            self.emit(SessionEvent::ComputerCancelled(ticket));
        }
        self.board = Board::new();
        self.to_play = Player::X;
        self.result = GameResult::InProgress;
        self.winning_pattern = None;
        info!(generation = self.generation, "Board reset");
        self.emit(SessionEvent::BoardReset);
    }

    /// Clears everything, including score and difficulty.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn reset_all(&mut self) {
        self.play_again();
        self.scores.reset();
        self.difficulty = None;
        info!("Session cleared");
        self.emit(SessionEvent::ScoreChanged(self.score()));
        self.emit(SessionEvent::SessionCleared);
    }

    // ─────────────────────────────────────────────────────────────
    //  Transitions
    // ─────────────────────────────────────────────────────────────

    fn is_current(&self, ticket: ComputerTurn) -> bool {
        self.pending == Some(ticket)
            && ticket.generation == self.generation
            && ticket.ply == self.board.occupied_count()
    }

    /// Marks a validated index and re-evaluates the board.
    fn apply(&mut self, index: usize) {
        let player = self.to_play;
        self.board.place(index, player);
        info!(%player, index, "Move applied");
        self.emit(SessionEvent::MoveApplied { player, index });

        let (result, winning_pattern) = evaluate(&self.board);
        if result.is_finished() {
            self.result = result;
            self.winning_pattern = winning_pattern;
            info!(%result, ?winning_pattern, "Game finished");
            self.emit(SessionEvent::ResultChanged {
                result,
                winning_pattern,
            });
            if self.scores.record(result) {
                self.emit(SessionEvent::ScoreChanged(self.score()));
            }
        } else {
            self.to_play = player.opponent();
        }
    }

    /// Issues a computer ticket if the computer is now to move.
    fn request_computer_turn(&mut self) -> Result<(), SessionError> {
        let computer_plays = self.difficulty.is_some_and(Difficulty::has_computer);
        if !computer_plays || self.result.is_finished() || self.to_play != COMPUTER {
            return Ok(());
        }

        let ticket = ComputerTurn {
            generation: self.generation,
            ply: self.board.occupied_count(),
        };
        self.pending = Some(ticket);
        debug!(?ticket, pacing = ?self.pacing, "Computer to move");
        self.emit(SessionEvent::ComputerThinking(ticket));

        match self.pacing {
            Pacing::Immediate => self.fire_computer_turn(ticket).map(|_| ()),
            Pacing::Deferred => Ok(()),
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl MoveContext for GameSession {
    fn board(&self) -> &Board {
        &self.board
    }

    fn result(&self) -> GameResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[test]
    fn test_initial_state() {
        let session = GameSession::with_seed(Pacing::Immediate, 1);
        assert_eq!(session.state(), SessionState::AwaitingMove(Player::X));
        assert_eq!(session.difficulty(), None);
        assert_eq!(session.board(), &Board::new());
    }

    #[test]
    fn test_move_requires_difficulty() {
        let mut session = GameSession::with_seed(Pacing::Immediate, 1);
        assert_eq!(session.submit_move(0), Err(SessionError::NoSession));
    }

    #[test]
    fn test_two_player_alternates() {
        let mut session = GameSession::with_seed(Pacing::Immediate, 1);
        session.choose_difficulty(Difficulty::TwoPlayer).unwrap();
        session.submit_move(4).unwrap();
        assert_eq!(session.state(), SessionState::AwaitingMove(Player::O));
        session.submit_move(0).unwrap();
        assert_eq!(session.state(), SessionState::AwaitingMove(Player::X));
        assert_eq!(session.pending_computer_turn(), None);
    }

    #[test]
    fn test_rejected_move_leaves_state() {
        let mut session = GameSession::with_seed(Pacing::Immediate, 1);
        session.choose_difficulty(Difficulty::TwoPlayer).unwrap();
        session.submit_move(4).unwrap();
        let before = session.snapshot();
        assert_eq!(
            session.submit_move(4),
            Err(SessionError::Rejected(MoveError::CellOccupied(4)))
        );
        assert_eq!(
            session.submit_move(12),
            Err(SessionError::Rejected(MoveError::OutOfRange(12)))
        );
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_immediate_computer_replies_in_same_call() {
        let mut session = GameSession::with_seed(Pacing::Immediate, 9);
        session.choose_difficulty(Difficulty::Hard).unwrap();
        session.submit_move(0).unwrap();
        assert_eq!(session.board().occupied_count(), 2);
        assert_eq!(session.state(), SessionState::AwaitingMove(Player::X));
        // The only reply to a corner opening that does not lose is the center.
        assert!(!session.board().is_empty(4));
    }

    #[test]
    fn test_deferred_ticket_and_stale_after_reset() {
        let mut session = GameSession::with_seed(Pacing::Deferred, 2);
        session.choose_difficulty(Difficulty::Easy).unwrap();
        session.submit_move(0).unwrap();

        let ticket = session.pending_computer_turn().expect("computer turn pending");
        assert_eq!(*ticket.ply(), 1);
        assert_eq!(session.state(), SessionState::AwaitingMove(Player::O));

        session.play_again();
        assert_eq!(session.fire_computer_turn(ticket), Ok(None));
        assert_eq!(session.board(), &Board::new());
    }

    #[test]
    fn test_deferred_ticket_fires_once() {
        let mut session = GameSession::with_seed(Pacing::Deferred, 2);
        session.choose_difficulty(Difficulty::Medium).unwrap();
        session.submit_move(0).unwrap();
        let ticket = session.pending_computer_turn().unwrap();

        let index = session.fire_computer_turn(ticket).unwrap().unwrap();
        assert_ne!(index, 0);
        assert_eq!(session.fire_computer_turn(ticket), Ok(None));
        assert_eq!(session.board().occupied_count(), 2);
    }

    #[test]
    fn test_human_move_preempts_pending_turn() {
        let mut session = GameSession::with_seed(Pacing::Deferred, 2);
        session.choose_difficulty(Difficulty::Easy).unwrap();
        let mut rx = session.subscribe();
        session.submit_move(0).unwrap();
        let ticket = session.pending_computer_turn().unwrap();

        session.submit_move(1).unwrap();
        assert_eq!(session.pending_computer_turn(), None);
        assert_eq!(session.fire_computer_turn(ticket), Ok(None));
        assert!(drain(&mut rx).contains(&SessionEvent::ComputerCancelled(ticket)));
    }

    #[test]
    fn test_events_for_win() {
        let mut session = GameSession::with_seed(Pacing::Immediate, 1);
        session.choose_difficulty(Difficulty::TwoPlayer).unwrap();
        let mut rx = session.subscribe();
        for index in [0, 3, 1, 4, 2] {
            session.submit_move(index).unwrap();
        }
        let events = drain(&mut rx);
        assert!(events.contains(&SessionEvent::ResultChanged {
            result: GameResult::Won(Player::X),
            winning_pattern: Some(WinPattern::ALL[0]),
        }));
        assert_eq!(events.last(), Some(&SessionEvent::ScoreChanged(session.score())));
        assert_eq!(*session.score().first_wins(), 1);
    }

    #[test]
    fn test_dropped_subscriber_pruned() {
        let mut session = GameSession::with_seed(Pacing::Immediate, 1);
        drop(session.subscribe());
        session.choose_difficulty(Difficulty::TwoPlayer).unwrap();
        assert!(session.subscribers.is_empty());
    }
}

//! Tic-tac-toe arena - game engine with three computer opponents
//!
//! # Architecture
//!
//! - **Rules**: pure board evaluation and move validation
//! - **AI**: random (Easy), win/block heuristic (Medium), minimax (Hard)
//! - **Session**: turn state machine, score tally, event notifications
//! - **Pacing**: tokio driver adding a cancellable "thinking" pause
//!
//! # Example
//!
//! ```
//! use tictactoe_arena::{Difficulty, GameSession, Pacing, SessionState};
//!
//! let mut session = GameSession::with_seed(Pacing::Immediate, 7);
//! session.choose_difficulty(Difficulty::Hard)?;
//! session.submit_move(4)?;
//!
//! // The computer has already answered.
//! assert_eq!(session.board().occupied_count(), 2);
//! assert!(matches!(session.state(), SessionState::AwaitingMove(_)));
//! # Ok::<(), tictactoe_arena::SessionError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod ai;
mod config;
mod games;
pub mod pacing;
mod score;
mod session;
pub mod simulate;

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    Board, Cell, GameNotOver, GameResult, InRange, LegalMove, MoveContext, MoveError, Player,
    Position, Square, SquareIsEmpty, WinPattern, evaluate, rules, validate,
};

// Crate-level exports - Computer opponents
pub use ai::{
    AiError, Difficulty, Heuristic, Minimax, MoveSelector, RandomMove, WIN_SCORE,
    completing_move, select_move,
};

// Crate-level exports - Configuration
pub use config::{ConfigError, EngineConfig, SEED_ENV, THINK_DELAY_ENV};

// Crate-level exports - Scoring
pub use score::{Score, ScoreTracker};

// Crate-level exports - Session management
pub use session::{
    COMPUTER, ComputerTurn, GameSession, Pacing, SessionError, SessionEvent, SessionSnapshot,
    SessionState,
};

// Crate-level exports - Async driver
pub use pacing::SessionHandle;

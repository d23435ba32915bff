mod action;
mod contracts;
mod phases;
mod position;
pub mod rules;
mod types;

pub use action::MoveError;
pub use contracts::{GameNotOver, InRange, LegalMove, MoveContext, SquareIsEmpty, validate};
pub use phases::GameResult;
pub use position::Position;
pub use rules::{WinPattern, evaluate};
pub use types::{Board, Player, Square};

/// Alias matching the glossary: a square is a cell.
pub type Cell = Square;

//! Game rules for tic-tac-toe.
//!
//! Pure functions for evaluating a board. Rules are separated from the
//! session so that the validator and the computer opponents share them.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{WinPattern, check_winner, evaluate};

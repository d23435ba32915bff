//! Full-board and draw detection.

use super::super::Board;
use super::win::check_winner;

/// True once every square holds a mark.
pub fn is_full(board: &Board) -> bool {
    board.occupied_count() == Board::SIZE
}

/// True for a full board on which nobody completed a line.
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && check_winner(board).is_none()
}

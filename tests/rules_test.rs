//! Tests for board evaluation and move validation.

use proptest::prelude::*;
use tictactoe_arena::{
    Board, GameResult, MoveError, Player, Square, WinPattern, evaluate, rules, validate,
};

const FILL: [Square; 3] = [Square::Empty, Square::Occupied(Player::X), Square::Occupied(Player::O)];

/// Every way to fill `cells` with Empty/X/O.
fn fillings(base: Board, cells: &[usize]) -> Vec<Board> {
    cells.iter().fold(vec![base], |boards, &cell| {
        boards
            .into_iter()
            .flat_map(|board| {
                FILL.iter().map(move |square| {
                    let mut squares = *board.squares();
                    squares[cell] = *square;
                    Board::from_squares(squares)
                })
            })
            .collect()
    })
}

fn complete_patterns(board: &Board) -> Vec<WinPattern> {
    WinPattern::ALL
        .iter()
        .copied()
        .filter(|p| p.owner(board).is_some())
        .collect()
}

#[test]
fn test_every_pattern_wins_for_its_owner() {
    for pattern in WinPattern::ALL {
        for player in [Player::X, Player::O] {
            let base = pattern
                .cells()
                .iter()
                .fold(Board::new(), |b, &i| b.with_mark(i, player));
            let rest: Vec<usize> = (0..9).filter(|i| !pattern.cells().contains(i)).collect();

            for board in fillings(base, &rest) {
                if complete_patterns(&board) != vec![pattern] {
                    continue;
                }
                assert_eq!(
                    evaluate(&board),
                    (GameResult::Won(player), Some(pattern)),
                    "\n{board}"
                );
            }
        }
    }
}

#[test]
fn test_full_boards_without_line_are_draws() {
    let mut draws = 0;
    for bits in 0u16..512 {
        let squares: [Square; 9] = std::array::from_fn(|i| {
            if bits & (1 << i) != 0 {
                Square::Occupied(Player::X)
            } else {
                Square::Occupied(Player::O)
            }
        });
        let board = Board::from_squares(squares);
        if complete_patterns(&board).is_empty() {
            assert_eq!(evaluate(&board), (GameResult::Draw, None), "\n{board}");
            assert!(rules::is_draw(&board));
            draws += 1;
        }
    }
    assert!(draws > 0);
}

fn arb_square() -> impl Strategy<Value = Square> {
    prop_oneof![
        Just(Square::Empty),
        Just(Square::Occupied(Player::X)),
        Just(Square::Occupied(Player::O)),
    ]
}

fn arb_board() -> impl Strategy<Value = Board> {
    proptest::array::uniform9(arb_square()).prop_map(Board::from_squares)
}

proptest! {
    #[test]
    fn evaluate_agrees_with_lines(board in arb_board()) {
        let before = board;
        let (result, pattern) = evaluate(&board);
        prop_assert_eq!(board, before);

        match result {
            GameResult::Won(player) => {
                let pattern = pattern.expect("win reports its line");
                prop_assert_eq!(pattern.owner(&board), Some(player));
                prop_assert_eq!(Some(pattern), complete_patterns(&board).first().copied());
            }
            GameResult::Draw => {
                prop_assert!(pattern.is_none());
                prop_assert!(rules::is_full(&board));
                prop_assert!(complete_patterns(&board).is_empty());
            }
            GameResult::InProgress => {
                prop_assert!(pattern.is_none());
                prop_assert!(!rules::is_full(&board));
                prop_assert!(complete_patterns(&board).is_empty());
            }
        }
    }

    #[test]
    fn validator_rejects_occupied_and_finished(board in arb_board(), index in 0usize..12) {
        let (result, _) = evaluate(&board);
        let verdict = validate(&(board, result), index);

        if index >= 9 {
            prop_assert_eq!(verdict, Err(MoveError::OutOfRange(index)));
        } else if !board.is_empty(index) {
            prop_assert_eq!(verdict, Err(MoveError::CellOccupied(index)));
        } else if result != GameResult::InProgress {
            prop_assert_eq!(verdict, Err(MoveError::GameOver(result)));
        } else {
            prop_assert_eq!(verdict, Ok(()));
        }
    }
}

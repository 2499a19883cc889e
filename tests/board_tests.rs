//! Board tests - gravity, validation and line detection

use connect_four::core::{Board, MoveError, PlacementError};
use connect_four::types::{Outcome, Owner, Position, CELL_COUNT, COLS, ROWS};

fn pos(row: u8, col: u8) -> Position {
    Position::new(row, col).unwrap()
}

/// Full-board pattern with no line of four: every column alternates from the
/// floor up, starting with Client, except column 3 which starts with Opponent.
fn owner_in_tie_pattern(row: u8, col: u8) -> Owner {
    let height = ROWS - 1 - row;
    if (height % 2 == 0) != (col == 3) {
        Owner::Client
    } else {
        Owner::Opponent
    }
}

/// Every cell of the tie pattern except `skip`.
fn tie_pattern_without(skip: Position) -> Board {
    let mut board = Board::new();
    for row in 0..ROWS {
        for col in 0..COLS {
            let p = pos(row, col);
            if p != skip {
                board.place_at(p, owner_in_tie_pattern(row, col)).unwrap();
            }
        }
    }
    board
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.occupied(), 0);
    assert!(!board.is_full());
    for row in 0..ROWS {
        for col in 0..COLS {
            assert_eq!(board.get(row, col), Some(None));
        }
    }
    assert_eq!(board.get(ROWS, 0), None);
    assert_eq!(board.get(0, COLS), None);
}

#[test]
fn test_drops_stack_from_the_floor() {
    let mut board = Board::new();
    for n in 0..ROWS {
        let owner = if n % 2 == 0 { Owner::Client } else { Owner::Opponent };
        let placed = board.drop_token(2, owner).unwrap();
        assert_eq!(placed, pos(ROWS - 1 - n, 2));
        assert_eq!(board.cell(placed), Some(owner));
    }
    assert_eq!(board.column_height(2), ROWS);
    assert!(!board.legal_columns().contains(&2));
}

#[test]
fn test_full_column_is_rejected_without_mutation() {
    let mut board = Board::new();
    for n in 0..ROWS {
        let owner = if n % 2 == 0 { Owner::Client } else { Owner::Opponent };
        board.drop_token(0, owner).unwrap();
    }
    let before = board.clone();

    assert_eq!(
        board.drop_token(0, Owner::Client),
        Err(MoveError::ColumnFull)
    );
    assert_eq!(board, before);
}

#[test]
fn test_invalid_column_is_rejected() {
    let mut board = Board::new();
    assert_eq!(
        board.drop_token(COLS, Owner::Client),
        Err(MoveError::InvalidColumn)
    );
    assert_eq!(
        board.drop_token(u8::MAX, Owner::Client),
        Err(MoveError::InvalidColumn)
    );
    assert_eq!(board.occupied(), 0);
}

#[test]
fn test_horizontal_win() {
    let mut board = Board::new();
    let mut last = None;
    for col in 1..5 {
        last = Some(board.drop_token(col, Owner::Client).unwrap());
    }
    let last = last.unwrap();
    assert!(board.check_win(last));
    assert_eq!(board.outcome_after(last), Some(Outcome::ClientWin));
}

#[test]
fn test_vertical_win() {
    let mut board = Board::new();
    for _ in 0..3 {
        let p = board.drop_token(6, Owner::Opponent).unwrap();
        assert!(!board.check_win(p));
    }
    let p = board.drop_token(6, Owner::Opponent).unwrap();
    assert_eq!(p, pos(2, 6));
    assert_eq!(board.outcome_after(p), Some(Outcome::OpponentWin));
}

#[test]
fn test_diagonal_wins_both_directions() {
    // Rising to the right: (5,0) (4,1) (3,2) (2,3)
    let mut rising = Board::new();
    for (row, col) in [(5, 0), (4, 1), (3, 2), (2, 3)] {
        rising.place_at(pos(row, col), Owner::Client).unwrap();
    }
    assert!(rising.check_win(pos(4, 1)));

    // Falling to the right: (2,3) (3,4) (4,5) (5,6)
    let mut falling = Board::new();
    for (row, col) in [(5, 6), (2, 3), (4, 5), (3, 4)] {
        falling.place_at(pos(row, col), Owner::Opponent).unwrap();
    }
    assert!(falling.check_win(pos(3, 4)));
}

#[test]
fn test_run_of_three_is_not_a_win() {
    let mut board = Board::new();
    for col in 0..3 {
        let p = board.drop_token(col, Owner::Client).unwrap();
        assert!(!board.check_win(p));
    }
    board.drop_token(3, Owner::Opponent).unwrap();
    assert!(!board.is_decided());
    assert_eq!(board.outcome_after(pos(5, 2)), None);
}

#[test]
fn test_decided_board_refuses_more_tokens() {
    let mut board = Board::new();
    for _ in 0..4 {
        board.drop_token(0, Owner::Client).unwrap();
    }
    assert!(board.is_decided());
    assert_eq!(
        board.drop_token(1, Owner::Opponent),
        Err(MoveError::BoardDecided)
    );
    assert_eq!(
        board.place_at(pos(5, 1), Owner::Opponent),
        Err(PlacementError::BoardDecided)
    );
}

#[test]
fn test_full_column_reports_full_even_when_decided() {
    // Vertical four that tops out column 0.
    let mut board = Board::new();
    for owner in [
        Owner::Opponent,
        Owner::Opponent,
        Owner::Client,
        Owner::Client,
        Owner::Client,
        Owner::Client,
    ] {
        board.drop_token(0, owner).unwrap();
    }
    assert!(board.is_decided());
    assert_eq!(board.column_height(0), ROWS);

    assert_eq!(
        board.drop_token(0, Owner::Opponent),
        Err(MoveError::ColumnFull)
    );
    assert_eq!(
        board.drop_token(COLS, Owner::Opponent),
        Err(MoveError::InvalidColumn)
    );
    assert_eq!(
        board.drop_token(1, Owner::Opponent),
        Err(MoveError::BoardDecided)
    );
}

#[test]
fn test_place_at_occupied_cell_fails() {
    let mut board = Board::new();
    let p = board.drop_token(3, Owner::Client).unwrap();
    assert_eq!(
        board.place_at(p, Owner::Opponent),
        Err(PlacementError::Occupied(p))
    );
    assert_eq!(board.cell(p), Some(Owner::Client));
}

#[test]
fn test_undo_only_removes_the_top_token() {
    let mut board = Board::new();
    let bottom = board.drop_token(4, Owner::Client).unwrap();
    let top = board.drop_token(4, Owner::Opponent).unwrap();

    assert_eq!(board.undo(bottom), None);
    assert_eq!(board.undo(top), Some(Owner::Opponent));
    assert_eq!(board.occupied(), 1);
    assert_eq!(board.landing_position(4), Some(top));
}

#[test]
fn test_full_board_without_line_is_a_tie() {
    let last = pos(0, 3);
    let mut board = tie_pattern_without(last);
    assert!(!board.is_decided());

    board.place_at(last, owner_in_tie_pattern(0, 3)).unwrap();
    assert_eq!(board.occupied(), CELL_COUNT);
    assert!(board.is_full());
    assert_eq!(board.outcome_after(last), Some(Outcome::Tie));
}

#[test]
fn test_win_on_final_cell_beats_tie() {
    // The top row of the pattern is O O O X O O O; an Opponent token in the
    // gap completes seven in a row on the 42nd placement.
    let last = pos(0, 3);
    let mut board = tie_pattern_without(last);

    board.place_at(last, Owner::Opponent).unwrap();
    assert!(board.is_full());
    assert_eq!(board.outcome_after(last), Some(Outcome::OpponentWin));
}

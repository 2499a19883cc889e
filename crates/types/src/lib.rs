//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (board logic, wire protocol, terminal rendering).
//!
//! # Board Dimensions
//!
//! Standard Connect Four grid:
//!
//! - **Columns**: 7 (indexed 0-6, left to right)
//! - **Rows**: 6 (indexed 0-5, top to bottom; row 5 is the floor)
//! - **Tokens**: 21 per participant, 42 cells in total
//!
//! # Examples
//!
//! ```
//! use connect_four_types::{Owner, Position, COLS, ROWS};
//!
//! let p = Position::new(5, 3).unwrap();
//! assert_eq!((p.row(), p.col()), (5, 3));
//! assert!(Position::new(ROWS, 0).is_none());
//! assert!(Position::new(0, COLS).is_none());
//!
//! assert_eq!(Owner::Client.other(), Owner::Opponent);
//! ```

use std::fmt;

/// Board height in cells (6 rows)
pub const ROWS: u8 = 6;

/// Board width in cells (7 columns)
pub const COLS: u8 = 7;

/// Total number of cells on the board
pub const CELL_COUNT: u8 = ROWS * COLS;

/// Tokens each participant holds at the start of a match
pub const TOKENS_PER_PLAYER: u8 = CELL_COUNT / 2;

/// Length of a winning line
pub const WIN_LENGTH: u8 = 4;

/// Well-known TCP port of the responder
pub const DEFAULT_PORT: u16 = 50000;

/// Which participant a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    /// The local human participant
    Client,
    /// The remote decision-making participant
    Opponent,
}

impl Owner {
    /// Get the other participant
    pub fn other(self) -> Owner {
        match self {
            Owner::Client => Owner::Opponent,
            Owner::Opponent => Owner::Client,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Owner::Client => "client",
            Owner::Opponent => "opponent",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(Owner)`: Cell holding that participant's token
pub type Cell = Option<Owner>;

/// A cell coordinate in the 0-based 6x7 grid.
///
/// Row 0 is the top of the board, row 5 the bottom. Construction is checked,
/// so a `Position` is always on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    /// Create a position, returning `None` when it falls outside the grid
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < ROWS && col < COLS {
            Some(Self { row, col })
        } else {
            None
        }
    }

    pub const fn row(&self) -> u8 {
        self.row
    }

    pub const fn col(&self) -> u8 {
        self.col
    }

    /// Step by a signed offset, returning `None` when leaving the grid
    pub fn offset(&self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;
        if row < 0 || col < 0 {
            return None;
        }
        Self::new(row as u8, col as u8)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(row {}, col {})", self.row, self.col)
    }
}

/// Terminal classification of a concluded match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    ClientWin,
    OpponentWin,
    Tie,
}

impl Outcome {
    /// Outcome for a four-in-a-row completed by `owner`
    pub fn win_for(owner: Owner) -> Self {
        match owner {
            Owner::Client => Outcome::ClientWin,
            Owner::Opponent => Outcome::OpponentWin,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::ClientWin => "client_win",
            Outcome::OpponentWin => "opponent_win",
            Outcome::Tie => "tie",
        }
    }
}

/// Front-end intents produced by input handling.
///
/// These are the only ways the human participant drives a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Move the column cursor one step left
    CursorLeft,
    /// Move the column cursor one step right
    CursorRight,
    /// Jump the cursor to a column (0-based)
    SelectColumn(u8),
    /// Drop a token in the column under the cursor
    Drop,
    /// Answer "yes" to the rematch prompt
    Accept,
    /// Answer "no" to the rematch prompt
    Decline,
    /// Leave the application
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_constants() {
        assert_eq!(CELL_COUNT, 42);
        assert_eq!(TOKENS_PER_PLAYER, 21);
        assert_eq!(WIN_LENGTH, 4);
    }

    #[test]
    fn position_rejects_off_board_coordinates() {
        assert!(Position::new(0, 0).is_some());
        assert!(Position::new(5, 6).is_some());
        assert!(Position::new(6, 0).is_none());
        assert!(Position::new(0, 7).is_none());
    }

    #[test]
    fn position_offset_stays_on_board() {
        let corner = Position::new(5, 0).unwrap();
        assert_eq!(corner.offset(-1, 1), Position::new(4, 1));
        assert_eq!(corner.offset(1, 0), None);
        assert_eq!(corner.offset(0, -1), None);
    }

    #[test]
    fn outcome_for_winner() {
        assert_eq!(Outcome::win_for(Owner::Client), Outcome::ClientWin);
        assert_eq!(Outcome::win_for(Owner::Opponent), Outcome::OpponentWin);
    }
}

//! Board module - manages the game grid
//!
//! The board is a 7x6 grid where each cell can be empty or hold one participant's token.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (row, col) where row ranges 0..5 (top to bottom), col ranges 0..6 (left to right).
//! Tokens fall to the lowest empty row of a column, so row 5 fills first.

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::types::{Cell, Outcome, Owner, Position, CELL_COUNT, COLS, ROWS, WIN_LENGTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = CELL_COUNT as usize;

/// Line directions checked through a placed cell: horizontal, vertical, diagonal ↗, diagonal ↘.
const AXES: [(i8, i8); 4] = [(0, 1), (1, 0), (-1, 1), (1, 1)];

/// Reasons a gravity drop is refused. The board is never mutated on error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("column is full")]
    ColumnFull,
    #[error("column is outside 0..=6")]
    InvalidColumn,
    #[error("board already holds four in a row")]
    BoardDecided,
}

/// Reasons a mirrored placement is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("cell {0} is already occupied")]
    Occupied(Position),
    #[error("board already holds four in a row")]
    BoardDecided,
}

/// The game board - 7 columns x 6 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major order (row * COLS + col)
    cells: [Cell; BOARD_SIZE],
    occupied: u8,
    /// Set once a placement completes a line; no further placements are accepted
    decided: bool,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
            occupied: 0,
            decided: false,
        }
    }

    #[inline(always)]
    fn index(pos: Position) -> usize {
        (pos.row() as usize) * (COLS as usize) + (pos.col() as usize)
    }

    /// Get cell at a position
    pub fn cell(&self, pos: Position) -> Cell {
        self.cells[Self::index(pos)]
    }

    /// Get cell at (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: u8, col: u8) -> Option<Cell> {
        Position::new(row, col).map(|pos| self.cell(pos))
    }

    /// Number of occupied cells
    pub fn occupied(&self) -> u8 {
        self.occupied
    }

    /// True once some placement has completed four in a row
    pub fn is_decided(&self) -> bool {
        self.decided
    }

    /// True when all 42 cells are occupied
    pub fn is_full(&self) -> bool {
        self.occupied == CELL_COUNT
    }

    /// Where a token dropped into `column` would land, scanning from the bottom up.
    /// Returns None for a full or out-of-range column.
    pub fn landing_position(&self, column: u8) -> Option<Position> {
        if column >= COLS {
            return None;
        }
        (0..ROWS)
            .rev()
            .filter_map(|row| Position::new(row, column))
            .find(|&pos| self.cell(pos).is_none())
    }

    /// Number of tokens stacked in a column
    pub fn column_height(&self, column: u8) -> u8 {
        match self.landing_position(column) {
            Some(pos) => ROWS - 1 - pos.row(),
            None if column < COLS => ROWS,
            None => 0,
        }
    }

    /// Columns that can still take a token, left to right
    pub fn legal_columns(&self) -> ArrayVec<u8, { COLS as usize }> {
        (0..COLS)
            .filter(|&col| self.landing_position(col).is_some())
            .collect()
    }

    /// Gravity drop: place `owner`'s token in the lowest empty row of `column`.
    pub fn drop_token(&mut self, column: u8, owner: Owner) -> Result<Position, MoveError> {
        if column >= COLS {
            return Err(MoveError::InvalidColumn);
        }
        let pos = self.landing_position(column).ok_or(MoveError::ColumnFull)?;
        if self.decided {
            return Err(MoveError::BoardDecided);
        }
        self.fill(pos, owner);
        Ok(pos)
    }

    /// Mirror a placement decided elsewhere, without gravity scanning.
    ///
    /// The remote side is the authority for where its token lands; an occupied
    /// target means the two boards disagree.
    pub fn place_at(&mut self, pos: Position, owner: Owner) -> Result<(), PlacementError> {
        if self.decided {
            return Err(PlacementError::BoardDecided);
        }
        if self.cell(pos).is_some() {
            return Err(PlacementError::Occupied(pos));
        }
        self.fill(pos, owner);
        Ok(())
    }

    fn fill(&mut self, pos: Position, owner: Owner) {
        self.cells[Self::index(pos)] = Some(owner);
        self.occupied += 1;
        self.decided = self.check_win(pos);
    }

    /// Remove the token at `pos` if it is the top token of its column.
    ///
    /// Returns the removed owner. The board cannot have been decided before the
    /// removed placement, so the decided flag is cleared.
    pub fn undo(&mut self, pos: Position) -> Option<Owner> {
        let owner = self.cell(pos)?;
        if let Some(above) = pos.offset(-1, 0) {
            if self.cell(above).is_some() {
                return None;
            }
        }
        self.cells[Self::index(pos)] = None;
        self.occupied -= 1;
        self.decided = false;
        Some(owner)
    }

    /// Check whether the token at `pos` is part of a line of four or more.
    ///
    /// Only lines through `pos` are examined; call it right after each placement.
    pub fn check_win(&self, pos: Position) -> bool {
        let Some(owner) = self.cell(pos) else {
            return false;
        };
        AXES.iter().any(|&(d_row, d_col)| {
            let run = 1
                + self.run_length(pos, owner, d_row, d_col)
                + self.run_length(pos, owner, -d_row, -d_col);
            run >= WIN_LENGTH
        })
    }

    /// Count contiguous `owner` cells stepping away from `pos` (exclusive).
    fn run_length(&self, pos: Position, owner: Owner, d_row: i8, d_col: i8) -> u8 {
        let mut count = 0;
        let mut cursor = pos.offset(d_row, d_col);
        while let Some(p) = cursor {
            if self.cell(p) != Some(owner) {
                break;
            }
            count += 1;
            cursor = p.offset(d_row, d_col);
        }
        count
    }

    /// Classify the board right after a placement at `pos`.
    ///
    /// A win on the final placement takes priority over a full board.
    pub fn outcome_after(&self, pos: Position) -> Option<Outcome> {
        match self.cell(pos) {
            Some(owner) if self.check_win(pos) => Some(Outcome::win_for(owner)),
            _ if self.is_full() => Some(Outcome::Tie),
            _ => None,
        }
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

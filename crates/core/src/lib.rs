//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the board rules of Connect Four. It has **zero
//! dependencies** on UI, networking, or I/O, so the same board can back the
//! client's local view and the responder's authoritative copy.
//!
//! # Game Rules
//!
//! - **Gravity**: A token dropped into a column lands in its lowest empty row
//! - **Win**: Four or more same-owner tokens in a horizontal, vertical, or diagonal line
//! - **Tie**: All 42 cells occupied and the final placement did not win
//! - **Anchor**: Win detection only inspects lines through the most recent placement
//!
//! # Example
//!
//! ```
//! use connect_four_core::Board;
//! use connect_four_types::{Outcome, Owner};
//!
//! let mut board = Board::new();
//! let mut last = None;
//! for _ in 0..4 {
//!     last = Some(board.drop_token(2, Owner::Client).unwrap());
//! }
//! let last = last.unwrap();
//! assert!(board.check_win(last));
//! assert_eq!(board.outcome_after(last), Some(Outcome::ClientWin));
//! ```

pub mod board;

pub use connect_four_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, MoveError, PlacementError};

//! Opponent move selection.
//!
//! The protocol only needs *some* legal column from the responder; how it is
//! picked is up to the [`Strategy`] plugged into the responder.

use crate::core::Board;
use crate::types::Owner;

/// Picks the responder's next column. `None` means no move is available.
pub trait Strategy: Send {
    fn choose_column(&mut self, board: &Board) -> Option<u8>;
}

/// Preferred columns when nothing tactical is at stake
const CENTER_OUT: [u8; 7] = [3, 2, 4, 1, 5, 0, 6];

/// One-ply greedy play: win if possible, otherwise block, otherwise stay central.
#[derive(Debug, Clone, Copy, Default)]
pub struct Greedy;

impl Strategy for Greedy {
    fn choose_column(&mut self, board: &Board) -> Option<u8> {
        let legal = board.legal_columns();

        [Owner::Opponent, Owner::Client]
            .iter()
            .find_map(|&owner| {
                legal
                    .iter()
                    .copied()
                    .find(|&col| completes_line(board, col, owner))
            })
            .or_else(|| CENTER_OUT.iter().copied().find(|col| legal.contains(col)))
    }
}

fn completes_line(board: &Board, column: u8, owner: Owner) -> bool {
    let mut probe = board.clone();
    probe
        .drop_token(column, owner)
        .map(|pos| probe.check_win(pos))
        .unwrap_or(false)
}

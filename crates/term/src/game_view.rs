//! GameView: maps the client's screen state into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::Board;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::tally::Tally;
use crate::types::{Outcome, Owner, COLS, ROWS};

/// Glyph drawn for the human's tokens.
pub const CLIENT_GLYPH: char = 'X';
/// Glyph drawn for the responder's tokens.
pub const OPPONENT_GLYPH: char = 'O';
const EMPTY_GLYPH: char = '.';
const CURSOR_GLYPH: char = 'v';

/// Terminal columns per board cell.
const CELL_W: u16 = 3;
const FRAME_W: u16 = COLS as u16 * CELL_W + 2;
const CONTENT_H: u16 = 18;

// Row offsets from the top of the content block.
const TITLE_Y: u16 = 0;
const CURSOR_Y: u16 = 2;
const FRAME_Y: u16 = 3;
const LABEL_Y: u16 = FRAME_Y + ROWS as u16 + 2;
const TALLY_Y: u16 = LABEL_Y + 2;
const DETAIL_Y: u16 = TALLY_Y + 1;
const STATUS_Y: u16 = DETAIL_Y + 2;
const HELP_Y: u16 = STATUS_Y + 1;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Which client screen is showing.
#[derive(Debug, Clone, Copy)]
pub enum Screen<'a> {
    /// Pre-connection: host entry
    Connect { host: &'a str },
    /// A match in progress
    Playing {
        board: &'a Board,
        cursor: u8,
        tokens_left: u8,
        /// A move request is outstanding; input is disabled
        waiting: bool,
    },
    /// A concluded match with the rematch prompt up
    Rematch { board: &'a Board, outcome: Outcome },
}

/// Everything the view needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ViewModel<'a> {
    pub screen: Screen<'a>,
    pub tally: Tally,
    /// Transient inline message ("Invalid move.", connection notices)
    pub status: Option<&'a str>,
}

const TEXT: CellStyle = CellStyle::fg(Rgb::new(220, 220, 220));
const MUTED: CellStyle = CellStyle::fg(Rgb::new(120, 120, 130));
const FRAME: CellStyle = CellStyle::fg(Rgb::new(70, 110, 220));
const CLIENT: CellStyle = CellStyle::fg(Rgb::new(240, 200, 40)).bold();
const OPPONENT: CellStyle = CellStyle::fg(Rgb::new(220, 60, 60)).bold();
const NOTICE: CellStyle = CellStyle::fg(Rgb::new(250, 130, 80));

/// A lightweight terminal view of the client screens.
#[derive(Debug, Clone, Copy)]
pub struct GameView {
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Top-left corner of the content block.
    pub fn origin(&self, viewport: Viewport) -> (u16, u16) {
        let x = viewport.width.saturating_sub(FRAME_W) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(CONTENT_H) / 2,
            AnchorY::Top => 0,
        };
        (x, y)
    }

    /// Terminal position of a board cell's glyph.
    pub fn cell_origin(&self, viewport: Viewport, row: u8, col: u8) -> (u16, u16) {
        let (x0, y0) = self.origin(viewport);
        (
            x0 + 1 + col as u16 * CELL_W + CELL_W / 2,
            y0 + FRAME_Y + 1 + row as u16,
        )
    }

    /// Render one frame into `fb`, resizing it to the viewport.
    pub fn render_into(&self, model: &ViewModel<'_>, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.reset(viewport.width, viewport.height);
        let (x0, y0) = self.origin(viewport);

        fb.put_str(x0, y0 + TITLE_Y, "CONNECT FOUR", TEXT.bold());

        match model.screen {
            Screen::Connect { host } => {
                fb.put_str(x0, y0 + CURSOR_Y, "Server IP (empty = localhost):", TEXT);
                fb.put_str(x0, y0 + FRAME_Y, &format!("> {}_", host), TEXT.bold());
                fb.put_str(x0, y0 + HELP_Y, "Enter connect   Esc quit", MUTED);
            }
            Screen::Playing {
                board,
                cursor,
                tokens_left,
                waiting,
            } => {
                self.draw_board(fb, viewport, board);
                if !waiting && cursor < COLS {
                    let (cx, _) = self.cell_origin(viewport, 0, cursor);
                    fb.put_char(cx, y0 + CURSOR_Y, CURSOR_GLYPH, CLIENT);
                }
                fb.put_str(
                    x0,
                    y0 + DETAIL_Y,
                    &format!("Tokens left: {}", tokens_left),
                    TEXT,
                );
                let help = if waiting {
                    "Waiting for opponent..."
                } else {
                    "<- -> / 1-7 column   Enter drop   q quit"
                };
                fb.put_str(x0, y0 + HELP_Y, help, MUTED);
            }
            Screen::Rematch { board, outcome } => {
                self.draw_board(fb, viewport, board);
                fb.put_str(x0, y0 + DETAIL_Y, outcome_text(outcome), TEXT.bold());
                fb.put_str(x0, y0 + HELP_Y, "Play again? (y/n)", TEXT);
            }
        }

        let tally = model.tally;
        fb.put_str(
            x0,
            y0 + TALLY_Y,
            &format!(
                "Wins {}   Losses {}   Ties {}",
                tally.wins, tally.losses, tally.ties
            ),
            TEXT,
        );

        if let Some(status) = model.status {
            fb.put_str(x0, y0 + STATUS_Y, status, NOTICE);
        }
    }

    fn draw_board(&self, fb: &mut FrameBuffer, viewport: Viewport, board: &Board) {
        let (x0, y0) = self.origin(viewport);
        let inner = "-".repeat((FRAME_W - 2) as usize);

        fb.put_str(x0, y0 + FRAME_Y, &format!("+{}+", inner), FRAME);
        for row in 0..ROWS {
            let y = y0 + FRAME_Y + 1 + row as u16;
            fb.put_char(x0, y, '|', FRAME);
            fb.put_char(x0 + FRAME_W - 1, y, '|', FRAME);
            for col in 0..COLS {
                let (cx, cy) = self.cell_origin(viewport, row, col);
                let (glyph, style) = match board.get(row, col).flatten() {
                    Some(Owner::Client) => (CLIENT_GLYPH, CLIENT),
                    Some(Owner::Opponent) => (OPPONENT_GLYPH, OPPONENT),
                    None => (EMPTY_GLYPH, MUTED),
                };
                fb.put_char(cx, cy, glyph, style);
            }
        }
        fb.put_str(
            x0,
            y0 + FRAME_Y + 1 + ROWS as u16,
            &format!("+{}+", inner),
            FRAME,
        );

        for col in 0..COLS {
            let (cx, _) = self.cell_origin(viewport, 0, col);
            let label = char::from_digit(col as u32 + 1, 10).unwrap_or('?');
            fb.put_char(cx, y0 + LABEL_Y, label, MUTED);
        }
    }
}

fn outcome_text(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::ClientWin => "You win!",
        Outcome::OpponentWin => "You lose.",
        Outcome::Tie => "Tie game.",
    }
}

//! Terminal front end for the Connect Four client.
//!
//! The view renders into a simple framebuffer that a renderer flushes to the
//! terminal. Nothing here talks to the network; the binary feeds the view
//! from a `GameSession` and its own screen state.

pub mod fb;
pub mod game_view;
pub mod renderer;
pub mod tally;

pub use connect_four_core as core;
pub use connect_four_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Screen, ViewModel, Viewport, CLIENT_GLYPH, OPPONENT_GLYPH};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use tally::Tally;

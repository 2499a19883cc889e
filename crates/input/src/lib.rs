//! Terminal input module (session-facing).
//!
//! This module is intentionally independent of the protocol. It maps
//! `crossterm` key events into [`crate::types::Intent`] values for the board
//! and rematch screens, and into text edits for the connect screen.

pub mod map;

pub use connect_four_types as types;

pub use map::{handle_key_event, handle_text_key, should_quit, TextEdit};

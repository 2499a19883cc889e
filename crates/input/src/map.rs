//! Key mapping from terminal events to client intents.

use crate::types::{Intent, COLS};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input on the board and rematch screens to an intent.
///
/// Keys that resolve to nothing return `None`; callers treat that as an
/// ambiguous input and change nothing.
pub fn handle_key_event(key: KeyEvent) -> Option<Intent> {
    match key.code {
        // Cursor
        KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => Some(Intent::CursorLeft),
        KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => Some(Intent::CursorRight),

        // Direct column pick, 1-based on the keyboard
        KeyCode::Char(c @ '1'..='9') => {
            let column = c as u8 - b'1';
            (column < COLS).then_some(Intent::SelectColumn(column))
        }

        // Drop
        KeyCode::Enter | KeyCode::Down | KeyCode::Char(' ' | 'j' | 'J') => Some(Intent::Drop),

        // Rematch prompt
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(Intent::Accept),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Intent::Decline),

        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Intent::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Intent::Quit),

        _ => None,
    }
}

/// Edits to the host field on the connect screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    Insert(char),
    Backspace,
    Submit,
    Cancel,
}

/// Map keyboard input on the connect screen.
///
/// Only characters that can appear in a dotted-quad address are accepted.
pub fn handle_text_key(key: KeyEvent) -> Option<TextEdit> {
    if should_quit(key) {
        return Some(TextEdit::Cancel);
    }
    match key.code {
        KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => Some(TextEdit::Insert(c)),
        KeyCode::Backspace => Some(TextEdit::Backspace),
        KeyCode::Enter => Some(TextEdit::Submit),
        KeyCode::Esc => Some(TextEdit::Cancel),
        _ => None,
    }
}

/// Check if key should quit the application.
pub fn should_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_cursor_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Left)),
            Some(Intent::CursorLeft)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('L'))),
            Some(Intent::CursorRight)
        );
    }

    #[test]
    fn test_digit_keys_select_columns() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('1'))),
            Some(Intent::SelectColumn(0))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('7'))),
            Some(Intent::SelectColumn(6))
        );
        // Off-board digits are ambiguous, not an out-of-range column.
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('8'))), None);
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('0'))), None);
    }

    #[test]
    fn test_drop_and_prompt_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Enter)),
            Some(Intent::Drop)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('y'))),
            Some(Intent::Accept)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('N'))),
            Some(Intent::Decline)
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Tab)), None);
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('q'))),
            Some(Intent::Quit)
        );
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Intent::Quit)
        );
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
    }

    #[test]
    fn test_text_entry() {
        assert_eq!(
            handle_text_key(KeyEvent::from(KeyCode::Char('.'))),
            Some(TextEdit::Insert('.'))
        );
        assert_eq!(handle_text_key(KeyEvent::from(KeyCode::Char('x'))), None);
        assert_eq!(
            handle_text_key(KeyEvent::from(KeyCode::Backspace)),
            Some(TextEdit::Backspace)
        );
        assert_eq!(
            handle_text_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(TextEdit::Cancel)
        );
    }
}

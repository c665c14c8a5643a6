//! Keyboard layouts handed to the transport for rendering

use super::text;
use serde::Serialize;

/// A button under a message that round-trips `data` back as a button event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineButton {
    pub caption: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Keyboard {
    /// Persistent reply keyboard; taps arrive as plain text
    Reply { rows: Vec<Vec<String>> },
    /// Buttons attached to one message
    Inline { rows: Vec<Vec<InlineButton>> },
}

/// The main keyboard: a single row with menu and credit
pub fn main_keyboard() -> Keyboard {
    Keyboard::Reply {
        rows: vec![vec![
            text::MAIN_KEYBOARD_MENU.to_string(),
            text::MAIN_KEYBOARD_CREDIT.to_string(),
        ]],
    }
}

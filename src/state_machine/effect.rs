//! Effects produced by state transitions

use super::state::ChatId;
use crate::db::UserRecord;
use crate::ui::keyboard::Keyboard;

/// Why a user lookup was requested; decides what happens when the record exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupIntent {
    /// `/start`: greet the user
    Greet,
    /// `/menu`: render the food menu
    ShowMenu,
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver a message through the transport
    Send {
        chat_id: ChatId,
        text: String,
        keyboard: Option<Keyboard>,
    },

    /// Look up the session's user record
    LookupUser { intent: LookupIntent },

    /// Persist a completed onboarding record
    SaveUser { record: UserRecord },

    /// Load the catalog and send the rendered menu
    ShowMenu,

    /// Hand an event nothing matched to the unknown-event handler
    Unmatched { input: String },
}

impl Effect {
    pub fn send(chat_id: ChatId, text: impl Into<String>) -> Self {
        Effect::Send {
            chat_id,
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn send_with_keyboard(chat_id: ChatId, text: impl Into<String>, keyboard: Keyboard) -> Self {
        Effect::Send {
            chat_id,
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

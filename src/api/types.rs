//! API request and response types

use crate::state_machine::{ChatId, Event, SessionContext, UserId};
use serde::{Deserialize, Serialize};

/// One inbound chat update: a typed message or a button tap
#[derive(Debug, Deserialize)]
pub struct InboundUpdate {
    pub user_id: UserId,
    pub chat_id: ChatId,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub callback_data: Option<String>,
}

impl InboundUpdate {
    /// Split into the session it belongs to and the event it carries.
    /// Exactly one of `text` and `callback_data` must be present.
    pub fn into_parts(self) -> Result<(SessionContext, Event), String> {
        let context = SessionContext::new(self.user_id, self.chat_id);
        match (self.text, self.callback_data) {
            (Some(text), None) => Ok((context, Event::text(text))),
            (None, Some(data)) => Ok((context, Event::button(data))),
            (None, None) => Err("update carries neither text nor callback_data".to_string()),
            (Some(_), Some(_)) => Err("update carries both text and callback_data".to_string()),
        }
    }
}

/// Response for an accepted update
#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub queued: bool,
}

/// Generic error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

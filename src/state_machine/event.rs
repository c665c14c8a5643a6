//! Events that can occur in a session

use super::effect::LookupIntent;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // Inbound events
    /// Free text or a slash command typed by the user
    Text { text: String },
    /// Opaque callback data from an inline button tap
    Button { data: String },

    // Collaborator replies
    /// Result of a user-store lookup requested by `Effect::LookupUser`
    UserLookup { intent: LookupIntent, found: bool },
    /// The onboarding record was written
    UserSaved,
    /// A store operation failed; the dialogue step is abandoned
    StoreFailed { error: String },

    // Housekeeping
    /// The session outlived its TTL and is being discarded
    Expired,
}

impl Event {
    pub fn text(text: impl Into<String>) -> Self {
        Event::Text { text: text.into() }
    }

    pub fn button(data: impl Into<String>) -> Self {
        Event::Button { data: data.into() }
    }

    /// Raw user input carried by an inbound event
    pub fn raw_input(&self) -> Option<&str> {
        match self {
            Event::Text { text } => Some(text),
            Event::Button { data } => Some(data),
            _ => None,
        }
    }
}

//! Dialogue state types

use crate::db::UserRecord;
use crate::ui::text;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Stable identity of a chat user
pub type UserId = i64;

/// Destination address for replies (may differ from the user id in group chats)
pub type ChatId = i64;

/// Payload key holding the student id collected during onboarding
pub const STUDENT_ID_KEY: &str = "student-id";

/// Payload key holding the password collected during onboarding
pub const PASSWORD_KEY: &str = "password";

// ============================================================================
// Questions - the named continuations of a dialogue
// ============================================================================

/// A question the bot is waiting on. Each variant names the continuation
/// that runs when the user answers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Question {
    /// Onboarding step 1
    StudentId,
    /// Onboarding step 2
    Password,
}

impl Question {
    /// Text sent to the user when this question is asked
    pub fn prompt(self) -> &'static str {
        match self {
            Question::StudentId => text::MSG_ENTER_STUDENT_ID,
            Question::Password => text::MSG_ENTER_PASSWORD,
        }
    }

    /// Name used in logs
    pub fn name(self) -> &'static str {
        match self {
            Question::StudentId => "student_id",
            Question::Password => "password",
        }
    }
}

// ============================================================================
// Dialogue State
// ============================================================================

/// Dialogue state of a single session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogueState {
    /// No question pending; inbound events go through the command table
    #[default]
    Idle,

    /// The next inbound text or button payload answers `question`
    AwaitingAnswer { question: Question },
}

impl DialogueState {
    /// The pending question, if any
    pub fn pending(&self) -> Option<Question> {
        match self {
            DialogueState::Idle => None,
            DialogueState::AwaitingAnswer { question } => Some(*question),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, DialogueState::Idle)
    }
}

// ============================================================================
// Payload
// ============================================================================

/// Checked-extraction failures for [`Payload`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("payload field missing: {0}")]
    Missing(&'static str),
    #[error("payload field empty: {0}")]
    Empty(&'static str),
}

/// Transient key/value data collected while a dialogue is in progress.
///
/// Values are only ever strings and every read goes through [`Payload::get`],
/// which reports absence instead of assuming it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Payload {
    fields: HashMap<String, String>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.fields.insert(key.to_string(), value.into());
    }

    /// Builder form of [`Payload::set`]
    #[allow(dead_code)] // Used in tests
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Read a field that must be present and non-blank
    pub fn get(&self, key: &'static str) -> Result<&str, PayloadError> {
        match self.fields.get(key) {
            None => Err(PayloadError::Missing(key)),
            Some(value) if value.trim().is_empty() => Err(PayloadError::Empty(key)),
            Some(value) => Ok(value.as_str()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[allow(dead_code)] // Used in tests
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Assemble the onboarding result from the collected fields
    pub fn user_record(&self, user_id: UserId) -> Result<UserRecord, PayloadError> {
        Ok(UserRecord {
            user_id,
            student_id: self.get(STUDENT_ID_KEY)?.to_string(),
            password: self.get(PASSWORD_KEY)?.to_string(),
        })
    }
}

// ============================================================================
// Session Context
// ============================================================================

/// Identity of the session a transition runs for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: UserId,
    pub chat_id: ChatId,
}

impl SessionContext {
    pub fn new(user_id: UserId, chat_id: ChatId) -> Self {
        Self { user_id, chat_id }
    }
}

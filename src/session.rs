//! Session store
//!
//! One session per user, created lazily on the first inbound event. Each
//! session sits behind its own async mutex: events for the same user are
//! serialized, events for different users never wait on each other.

use crate::state_machine::{ChatId, DialogueState, Payload, SessionContext, UserId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// Conversation state of one user
#[derive(Debug, Clone)]
pub struct Session {
    pub context: SessionContext,
    pub state: DialogueState,
    pub payload: Payload,
    /// Last time the state or payload changed
    pub last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new(context: SessionContext, now: DateTime<Utc>) -> Self {
        Self {
            context,
            state: DialogueState::Idle,
            payload: Payload::new(),
            last_activity: now,
        }
    }

    /// Point replies at the chat the latest event came from
    pub fn rebind_chat(&mut self, chat_id: ChatId) {
        self.context.chat_id = chat_id;
    }

    /// Apply a transition outcome; returns whether anything changed
    pub fn apply(&mut self, state: DialogueState, payload: Payload, now: DateTime<Utc>) -> bool {
        if self.state == state && self.payload == payload {
            return false;
        }
        self.state = state;
        self.payload = payload;
        self.last_activity = now;
        true
    }

    /// Drop back to `Idle` and forget the payload
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.apply(DialogueState::Idle, Payload::new(), now);
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        (now - self.last_activity)
            .to_std()
            .is_ok_and(|age| age >= ttl)
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// Shared map of sessions keyed by user
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<UserId, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing session for the user, or a fresh `Idle` one. Never fails.
    pub async fn get(&self, context: SessionContext) -> SessionHandle {
        if let Some(handle) = self.sessions.read().await.get(&context.user_id) {
            return Arc::clone(handle);
        }

        let mut sessions = self.sessions.write().await;
        Arc::clone(
            sessions
                .entry(context.user_id)
                .or_insert_with(|| Arc::new(Mutex::new(Session::new(context, Utc::now())))),
        )
    }

    /// Snapshot of a user's session, if one exists
    #[allow(dead_code)] // Used in tests
    pub async fn peek(&self, user_id: UserId) -> Option<Session> {
        let handle = self.sessions.read().await.get(&user_id).cloned()?;
        let session = handle.lock().await;
        Some(session.clone())
    }

    #[allow(dead_code)] // Used in tests
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Remove and return sessions idle for at least `ttl`.
    ///
    /// A session is skipped while any event handler holds or waits on it.
    /// Handles are only cloned under the map lock, so with the write lock
    /// held a strong count of one means nobody else can reach the session.
    pub async fn take_expired(&self, now: DateTime<Utc>, ttl: Duration) -> Vec<Session> {
        let mut sessions = self.sessions.write().await;
        let mut expired = Vec::new();

        sessions.retain(|_, handle| {
            if Arc::strong_count(handle) > 1 {
                return true;
            }
            let Ok(session) = handle.try_lock() else {
                return true;
            };
            if session.is_expired(now, ttl) {
                expired.push(session.clone());
                false
            } else {
                true
            }
        });

        expired
    }
}

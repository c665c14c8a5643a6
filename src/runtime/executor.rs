//! Conversation engine

use super::traits::{Storage, Transport};
use crate::menu::{render_menu, Localizer};
use crate::session::{Session, SessionStore};
use crate::state_machine::{
    transition, ChatId, Effect, Event, LookupIntent, SessionContext, UserId,
};
use crate::ui::keyboard::Keyboard;
use crate::ui::text;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Engine settings
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// How long a session may sit untouched before it is discarded
    pub session_ttl: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Generic conversation engine that can work with any storage, transport,
/// and calendar implementations.
///
/// All state lives in the engine value; several engines can run side by side.
pub struct Engine<S, T, L>
where
    S: Storage + 'static,
    T: Transport + 'static,
    L: Localizer + 'static,
{
    sessions: SessionStore,
    storage: S,
    transport: T,
    localizer: L,
    config: EngineConfig,
}

impl<S, T, L> Engine<S, T, L>
where
    S: Storage + 'static,
    T: Transport + 'static,
    L: Localizer + 'static,
{
    pub fn new(storage: S, transport: T, localizer: L, config: EngineConfig) -> Self {
        Self {
            sessions: SessionStore::new(),
            storage,
            transport,
            localizer,
            config,
        }
    }

    #[allow(dead_code)] // Used in tests
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Process one inbound event for a user.
    ///
    /// Holds the user's session for the whole step, so a second event from the
    /// same user waits until this one is done.
    pub async fn handle(&self, context: SessionContext, event: Event) {
        let handle = self.sessions.get(context).await;
        let mut session = handle.lock().await;

        tracing::debug!(
            user_id = context.user_id,
            state = ?session.state,
            event = ?event,
            "Handling event"
        );

        self.process(&mut session, context, event).await;
    }

    /// Run transitions until no effect produces a follow-up event.
    ///
    /// Replies go to `context`'s chat. The session adopts that chat only when
    /// a transition actually changes it.
    async fn process(&self, session: &mut Session, context: SessionContext, event: Event) {
        // Process events in a loop - no recursion
        let mut events_to_process = vec![event];

        while let Some(current_event) = events_to_process.pop() {
            // Pure state transition
            let result = match transition(
                &session.state,
                &session.payload,
                &context,
                current_event,
            ) {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(
                        user_id = context.user_id,
                        error = %e,
                        "Rejected event, resetting session"
                    );
                    session.reset(Utc::now());
                    session.rebind_chat(context.chat_id);
                    self.send(context.chat_id, text::MSG_AN_ERROR_OCCURRED, None)
                        .await;
                    return;
                }
            };

            let previous = session.state;
            let changed = session.apply(result.new_state, result.payload, Utc::now());
            if changed {
                session.rebind_chat(context.chat_id);
            }
            if changed && previous != session.state {
                tracing::info!(
                    user_id = context.user_id,
                    from = ?previous,
                    to = ?session.state,
                    "Dialogue state changed"
                );
            }

            // Execute effects and collect generated events
            for effect in result.effects {
                if let Some(generated_event) = self.execute_effect(&context, effect).await {
                    events_to_process.push(generated_event);
                }
            }
        }
    }

    /// Execute an effect and optionally return a generated event
    async fn execute_effect(&self, context: &SessionContext, effect: Effect) -> Option<Event> {
        match effect {
            Effect::Send {
                chat_id,
                text,
                keyboard,
            } => {
                self.send(chat_id, &text, keyboard.as_ref()).await;
                None
            }

            Effect::LookupUser { intent } => {
                Some(self.lookup_user(context.user_id, intent).await)
            }

            Effect::SaveUser { record } => match self.storage.insert_user(&record).await {
                Ok(()) => {
                    tracing::info!(user_id = record.user_id, "User onboarded");
                    Some(Event::UserSaved)
                }
                Err(error) => {
                    tracing::error!(user_id = record.user_id, error = %error, "Failed to save user");
                    Some(Event::StoreFailed { error })
                }
            },

            Effect::ShowMenu => match self.storage.list_foods_grouped_by_date().await {
                Ok(groups) => {
                    match render_menu(groups, &self.localizer) {
                        Some(menu) => {
                            self.send(context.chat_id, &menu.text, Some(&menu.keyboard))
                                .await;
                        }
                        None => self.send(context.chat_id, text::MSG_MENU_EMPTY, None).await,
                    }
                    None
                }
                Err(error) => {
                    tracing::error!(error = %error, "Failed to load food catalog");
                    Some(Event::StoreFailed { error })
                }
            },

            Effect::Unmatched { input } => {
                tracing::warn!(user_id = context.user_id, input = %input, "Unknown message");
                None
            }
        }
    }

    async fn lookup_user(&self, user_id: UserId, intent: LookupIntent) -> Event {
        match self.storage.find_user(user_id).await {
            Ok(Some(_)) => Event::UserLookup {
                intent,
                found: true,
            },
            Ok(None) => {
                tracing::debug!(user_id, "No user record, starting onboarding");
                Event::UserLookup {
                    intent,
                    found: false,
                }
            }
            Err(error) => {
                tracing::error!(user_id, error = %error, "User lookup failed");
                Event::StoreFailed { error }
            }
        }
    }

    async fn send(&self, chat_id: ChatId, text: &str, keyboard: Option<&Keyboard>) {
        // Delivery failures are logged by the transport
        let _ = self.transport.send(chat_id, text, keyboard).await;
    }

    /// Discard sessions older than the TTL, as of now
    pub async fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Utc::now()).await
    }

    /// Discard sessions older than the TTL at `now`.
    ///
    /// Sessions that were waiting on an answer get the expiry notice; idle
    /// ones are dropped silently.
    pub async fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let expired = self
            .sessions
            .take_expired(now, self.config.session_ttl)
            .await;
        let count = expired.len();

        for mut session in expired {
            if let Some(question) = session.state.pending() {
                tracing::info!(
                    user_id = session.context.user_id,
                    question = question.name(),
                    "Pending question expired"
                );
            }
            let context = session.context;
            self.process(&mut session, context, Event::Expired).await;
        }

        if count > 0 {
            tracing::debug!(count, "Swept expired sessions");
        }
        count
    }
}

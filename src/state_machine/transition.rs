//! Pure state transition function

use super::command::{self, Trigger};
use super::pending::{ask, resolve};
use super::state::{PASSWORD_KEY, STUDENT_ID_KEY};
use super::{DialogueState, Effect, Event, LookupIntent, Payload, Question, SessionContext};
use crate::ui::keyboard::main_keyboard;
use crate::ui::text;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: DialogueState,
    pub payload: Payload,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: DialogueState, payload: Payload) -> Self {
        Self {
            new_state: state,
            payload,
            effects: vec![],
        }
    }

    /// `Idle` with the payload discarded
    pub fn idle() -> Self {
        Self::new(DialogueState::Idle, Payload::new())
    }

    /// Same state and payload as before the event
    pub fn unchanged(state: DialogueState, payload: &Payload) -> Self {
        Self::new(state, payload.clone())
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs; all I/O is
/// expressed as effects for the engine to run.
pub fn transition(
    state: &DialogueState,
    payload: &Payload,
    ctx: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    // `/cancel` abandons a dialogue instead of answering it
    if command::is_cancel(&event) {
        return Ok(cancel(state, payload, ctx));
    }

    match (state, event) {
        // ============================================================
        // Answering a pending question
        // ============================================================
        (DialogueState::AwaitingAnswer { .. }, Event::Text { text: answer })
        | (DialogueState::AwaitingAnswer { .. }, Event::Button { data: answer }) => {
            let mut state = *state;
            let Some(question) = resolve(&mut state) else {
                return Err(TransitionError::InvalidTransition(
                    "pending question vanished".to_string(),
                ));
            };
            Ok(continue_dialogue(question, answer, payload.clone(), ctx))
        }

        // ============================================================
        // Command table
        // ============================================================
        (DialogueState::Idle, event @ (Event::Text { .. } | Event::Button { .. })) => {
            Ok(match command::match_trigger(&event) {
                Some(trigger) => handle_trigger(trigger, payload, ctx),
                None => unmatched(event, payload, ctx),
            })
        }

        // ============================================================
        // Collaborator replies
        // ============================================================

        // Lookup miss -> onboarding entry
        (DialogueState::Idle, Event::UserLookup { found: false, .. }) => {
            Ok(ask(ctx, Question::StudentId, Payload::new()))
        }

        (DialogueState::Idle, Event::UserLookup { found: true, intent: LookupIntent::Greet }) => {
            Ok(TransitionResult::idle().with_effect(Effect::send_with_keyboard(
                ctx.chat_id,
                text::MSG_WELCOME,
                main_keyboard(),
            )))
        }

        (DialogueState::Idle, Event::UserLookup { found: true, intent: LookupIntent::ShowMenu }) => {
            Ok(TransitionResult::idle().with_effect(Effect::ShowMenu))
        }

        (DialogueState::Idle, Event::UserSaved) => {
            Ok(TransitionResult::idle().with_effect(Effect::send_with_keyboard(
                ctx.chat_id,
                text::MSG_PROFILE_SUCCESS,
                main_keyboard(),
            )))
        }

        // Any failure ends the current step; the user restarts from a command
        (_, Event::StoreFailed { .. }) => Ok(fail_closed(ctx)),

        // ============================================================
        // Expiry
        // ============================================================
        (DialogueState::AwaitingAnswer { .. }, Event::Expired) => Ok(TransitionResult::idle()
            .with_effect(Effect::send(ctx.chat_id, text::MSG_SESSION_EXPIRED))),

        (DialogueState::Idle, Event::Expired) => Ok(TransitionResult::idle()),

        // ============================================================
        // Invalid
        // ============================================================
        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "{event:?} while {state:?}"
        ))),
    }
}

/// Run the continuation bound to `question` with the raw answer
fn continue_dialogue(
    question: Question,
    answer: String,
    mut payload: Payload,
    ctx: &SessionContext,
) -> TransitionResult {
    match question {
        Question::StudentId => {
            payload.set(STUDENT_ID_KEY, answer);
            // A blank id is malformed now, not after the password is typed
            match payload.get(STUDENT_ID_KEY) {
                Ok(_) => ask(ctx, Question::Password, payload),
                Err(_) => fail_closed(ctx),
            }
        }
        Question::Password => {
            payload.set(PASSWORD_KEY, answer);
            match payload.user_record(ctx.user_id) {
                Ok(record) => TransitionResult::idle().with_effect(Effect::SaveUser { record }),
                Err(_) => fail_closed(ctx),
            }
        }
    }
}

fn handle_trigger(trigger: Trigger, payload: &Payload, ctx: &SessionContext) -> TransitionResult {
    match trigger {
        Trigger::Start => TransitionResult::unchanged(DialogueState::Idle, payload)
            .with_effect(Effect::LookupUser {
                intent: LookupIntent::Greet,
            }),
        Trigger::Menu => TransitionResult::unchanged(DialogueState::Idle, payload)
            .with_effect(Effect::LookupUser {
                intent: LookupIntent::ShowMenu,
            }),
        Trigger::Reserve | Trigger::Food(_) => TransitionResult::unchanged(DialogueState::Idle, payload)
            .with_effect(Effect::send(ctx.chat_id, text::MSG_RESERVE_UNAVAILABLE)),
        Trigger::Credit => TransitionResult::unchanged(DialogueState::Idle, payload)
            .with_effect(Effect::send(ctx.chat_id, text::MSG_CREDIT_UNAVAILABLE)),
        // Handled before the table is consulted
        Trigger::Cancel => cancel(&DialogueState::Idle, payload, ctx),
    }
}

fn cancel(state: &DialogueState, payload: &Payload, ctx: &SessionContext) -> TransitionResult {
    if state.is_idle() {
        TransitionResult::unchanged(DialogueState::Idle, payload)
            .with_effect(Effect::send(ctx.chat_id, text::MSG_NOTHING_TO_CANCEL))
    } else {
        TransitionResult::idle().with_effect(Effect::send_with_keyboard(
            ctx.chat_id,
            text::MSG_CANCELLED,
            main_keyboard(),
        ))
    }
}

/// Unknown-event handler: no state change, one neutral reply
fn unmatched(event: Event, payload: &Payload, ctx: &SessionContext) -> TransitionResult {
    let input = event.raw_input().unwrap_or_default().to_string();
    TransitionResult::unchanged(DialogueState::Idle, payload).with_effects([
        Effect::Unmatched { input },
        Effect::send(ctx.chat_id, text::MSG_UNKNOWN),
    ])
}

/// Generic error reply; the session drops to `Idle` and forgets its payload
fn fail_closed(ctx: &SessionContext) -> TransitionResult {
    TransitionResult::idle().with_effect(Effect::send(ctx.chat_id, text::MSG_AN_ERROR_OCCURRED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::UserRecord;

    fn test_context() -> SessionContext {
        SessionContext::new(1001, 2002)
    }

    fn awaiting(question: Question) -> DialogueState {
        DialogueState::AwaitingAnswer { question }
    }

    fn sent_texts(effects: &[Effect]) -> Vec<&str> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Send { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_start_requests_lookup() {
        let result = transition(
            &DialogueState::Idle,
            &Payload::new(),
            &test_context(),
            Event::text("/start"),
        )
        .unwrap();

        assert_eq!(result.new_state, DialogueState::Idle);
        assert_eq!(
            result.effects,
            vec![Effect::LookupUser {
                intent: LookupIntent::Greet
            }]
        );
    }

    #[test]
    fn test_lookup_miss_enters_onboarding() {
        for intent in [LookupIntent::Greet, LookupIntent::ShowMenu] {
            let result = transition(
                &DialogueState::Idle,
                &Payload::new(),
                &test_context(),
                Event::UserLookup {
                    intent,
                    found: false,
                },
            )
            .unwrap();

            assert_eq!(result.new_state, awaiting(Question::StudentId));
            assert_eq!(sent_texts(&result.effects), vec![text::MSG_ENTER_STUDENT_ID]);
        }
    }

    #[test]
    fn test_lookup_hit_for_menu_shows_menu() {
        let result = transition(
            &DialogueState::Idle,
            &Payload::new(),
            &test_context(),
            Event::UserLookup {
                intent: LookupIntent::ShowMenu,
                found: true,
            },
        )
        .unwrap();

        assert_eq!(result.effects, vec![Effect::ShowMenu]);
    }

    #[test]
    fn test_student_id_answer_chains_to_password() {
        let result = transition(
            &awaiting(Question::StudentId),
            &Payload::new(),
            &test_context(),
            Event::text("12345"),
        )
        .unwrap();

        assert_eq!(result.new_state, awaiting(Question::Password));
        assert_eq!(result.payload.get(STUDENT_ID_KEY), Ok("12345"));
        assert_eq!(sent_texts(&result.effects), vec![text::MSG_ENTER_PASSWORD]);
    }

    #[test]
    fn test_blank_student_id_fails_before_password() {
        let result = transition(
            &awaiting(Question::StudentId),
            &Payload::new(),
            &test_context(),
            Event::text("   "),
        )
        .unwrap();

        assert_eq!(result.new_state, DialogueState::Idle);
        assert!(result.payload.is_empty());
        assert_eq!(sent_texts(&result.effects), vec![text::MSG_AN_ERROR_OCCURRED]);
    }

    #[test]
    fn test_password_answer_completes_onboarding() {
        let payload = Payload::new().with(STUDENT_ID_KEY, "12345");
        let result = transition(
            &awaiting(Question::Password),
            &payload,
            &test_context(),
            Event::text("secret"),
        )
        .unwrap();

        assert_eq!(result.new_state, DialogueState::Idle);
        assert!(result.payload.is_empty());
        assert_eq!(
            result.effects,
            vec![Effect::SaveUser {
                record: UserRecord {
                    user_id: 1001,
                    student_id: "12345".to_string(),
                    password: "secret".to_string(),
                }
            }]
        );
    }

    #[test]
    fn test_password_without_student_id_fails_closed() {
        let result = transition(
            &awaiting(Question::Password),
            &Payload::new(),
            &test_context(),
            Event::text("secret"),
        )
        .unwrap();

        assert_eq!(result.new_state, DialogueState::Idle);
        assert!(result.payload.is_empty());
        assert_eq!(sent_texts(&result.effects), vec![text::MSG_AN_ERROR_OCCURRED]);
    }

    #[test]
    fn test_command_while_awaiting_is_taken_as_answer() {
        let result = transition(
            &awaiting(Question::StudentId),
            &Payload::new(),
            &test_context(),
            Event::text("/menu"),
        )
        .unwrap();

        assert_eq!(result.new_state, awaiting(Question::Password));
        assert_eq!(result.payload.get(STUDENT_ID_KEY), Ok("/menu"));
    }

    #[test]
    fn test_button_while_awaiting_is_taken_as_answer() {
        let result = transition(
            &awaiting(Question::StudentId),
            &Payload::new(),
            &test_context(),
            Event::button("98765"),
        )
        .unwrap();

        assert_eq!(result.payload.get(STUDENT_ID_KEY), Ok("98765"));
    }

    #[test]
    fn test_cancel_abandons_dialogue() {
        let payload = Payload::new().with(STUDENT_ID_KEY, "12345");
        let result = transition(
            &awaiting(Question::Password),
            &payload,
            &test_context(),
            Event::text("/cancel"),
        )
        .unwrap();

        assert_eq!(result.new_state, DialogueState::Idle);
        assert!(result.payload.is_empty());
        assert_eq!(sent_texts(&result.effects), vec![text::MSG_CANCELLED]);
    }

    #[test]
    fn test_cancel_while_idle() {
        let result = transition(
            &DialogueState::Idle,
            &Payload::new(),
            &test_context(),
            Event::text("/cancel"),
        )
        .unwrap();

        assert_eq!(result.new_state, DialogueState::Idle);
        assert_eq!(sent_texts(&result.effects), vec![text::MSG_NOTHING_TO_CANCEL]);
    }

    #[test]
    fn test_unmatched_invokes_fallback_once() {
        let result = transition(
            &DialogueState::Idle,
            &Payload::new(),
            &test_context(),
            Event::text("what is for lunch?"),
        )
        .unwrap();

        assert_eq!(result.new_state, DialogueState::Idle);
        let fallbacks = result
            .effects
            .iter()
            .filter(|e| matches!(e, Effect::Unmatched { .. }))
            .count();
        assert_eq!(fallbacks, 1);
        assert_eq!(sent_texts(&result.effects), vec![text::MSG_UNKNOWN]);
    }

    #[test]
    fn test_store_failure_resets_to_idle() {
        let payload = Payload::new().with(STUDENT_ID_KEY, "12345");
        let result = transition(
            &awaiting(Question::Password),
            &payload,
            &test_context(),
            Event::StoreFailed {
                error: "disk full".to_string(),
            },
        )
        .unwrap();

        assert_eq!(result.new_state, DialogueState::Idle);
        assert!(result.payload.is_empty());
        assert_eq!(sent_texts(&result.effects), vec![text::MSG_AN_ERROR_OCCURRED]);
    }

    #[test]
    fn test_expiry_notifies_only_pending_sessions() {
        let pending = transition(
            &awaiting(Question::StudentId),
            &Payload::new(),
            &test_context(),
            Event::Expired,
        )
        .unwrap();
        assert_eq!(pending.new_state, DialogueState::Idle);
        assert_eq!(sent_texts(&pending.effects), vec![text::MSG_SESSION_EXPIRED]);

        let idle = transition(
            &DialogueState::Idle,
            &Payload::new(),
            &test_context(),
            Event::Expired,
        )
        .unwrap();
        assert!(idle.effects.is_empty());
    }

    #[test]
    fn test_lookup_reply_while_awaiting_is_invalid() {
        let result = transition(
            &awaiting(Question::StudentId),
            &Payload::new(),
            &test_context(),
            Event::UserSaved,
        );

        assert!(matches!(result, Err(TransitionError::InvalidTransition(_))));
    }
}

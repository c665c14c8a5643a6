//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::command::match_trigger;
use super::pending::resolve;
use super::state::*;
use super::transition::*;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> SessionContext {
    SessionContext::new(1, 1)
}

fn count_sends(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::Send { .. }))
        .count()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_question() -> impl Strategy<Value = Question> {
    prop_oneof![Just(Question::StudentId), Just(Question::Password)]
}

fn arb_state() -> impl Strategy<Value = DialogueState> {
    prop_oneof![
        Just(DialogueState::Idle),
        arb_question().prop_map(|question| DialogueState::AwaitingAnswer { question }),
    ]
}

/// Free text that never starts with `/`
fn arb_plain_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ?!]{1,30}"
}

fn arb_inbound() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_plain_text().prop_map(Event::text),
        "/[a-z]{1,10}".prop_map(Event::text),
        "[a-z0-9:]{1,20}".prop_map(Event::button),
    ]
}

fn arb_payload() -> impl Strategy<Value = Payload> {
    (
        proptest::option::of("[0-9]{1,10}"),
        proptest::option::of("[a-z]{1,10}"),
    )
        .prop_map(|(student_id, password)| {
            let mut payload = Payload::new();
            if let Some(v) = student_id {
                payload.set(STUDENT_ID_KEY, v);
            }
            if let Some(v) = password {
                payload.set(PASSWORD_KEY, v);
            }
            payload
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// A pending question is handed out at most once
    #[test]
    fn prop_resolve_is_single_use(state in arb_state()) {
        let expected = state.pending();
        let mut state = state;
        prop_assert_eq!(resolve(&mut state), expected);
        prop_assert_eq!(state, DialogueState::Idle);
        prop_assert_eq!(resolve(&mut state), None);
    }

    /// Transitions never panic on inbound input, from any state
    #[test]
    fn prop_inbound_never_panics(
        state in arb_state(),
        payload in arb_payload(),
        event in arb_inbound(),
    ) {
        let _ = transition(&state, &payload, &test_context(), event);
    }

    /// Answering a question never leaves the same question armed
    #[test]
    fn prop_answer_consumes_question(
        question in arb_question(),
        payload in arb_payload(),
        answer in arb_plain_text(),
    ) {
        let state = DialogueState::AwaitingAnswer { question };
        let result = transition(&state, &payload, &test_context(), Event::text(answer)).unwrap();
        prop_assert_ne!(result.new_state.pending(), Some(question));
    }

    /// Arming a question always emits exactly one outbound message
    #[test]
    fn prop_armed_question_sends_one_prompt(
        state in arb_state(),
        payload in arb_payload(),
        event in arb_inbound(),
    ) {
        if let Ok(result) = transition(&state, &payload, &test_context(), event) {
            if let Some(question) = result.new_state.pending() {
                prop_assert_eq!(count_sends(&result.effects), 1);
                prop_assert!(result.effects.contains(&Effect::send(1, question.prompt())));
            }
        }
    }

    /// Idle + input matching nothing: state and payload untouched, one fallback
    #[test]
    fn prop_unmatched_is_inert(text in arb_plain_text()) {
        let event = Event::text(text);
        prop_assume!(match_trigger(&event).is_none());

        let payload = Payload::new();
        let result = transition(&DialogueState::Idle, &payload, &test_context(), event).unwrap();
        prop_assert_eq!(result.new_state, DialogueState::Idle);
        prop_assert_eq!(&result.payload, &payload);
        let fallbacks = result
            .effects
            .iter()
            .filter(|e| matches!(e, Effect::Unmatched { .. }))
            .count();
        prop_assert_eq!(fallbacks, 1);
    }

    /// Whenever a transition lands in `Idle` from a dialogue, the payload is gone
    #[test]
    fn prop_idle_after_dialogue_has_no_payload(
        question in arb_question(),
        payload in arb_payload(),
        event in arb_inbound(),
    ) {
        let state = DialogueState::AwaitingAnswer { question };
        let result = transition(&state, &payload, &test_context(), event).unwrap();
        if result.new_state.is_idle() {
            prop_assert!(result.payload.is_empty());
        }
    }

    /// A failed store operation always ends in `Idle` with an error reply
    #[test]
    fn prop_store_failure_always_resets(
        state in arb_state(),
        payload in arb_payload(),
        error in "[a-z ]{0,20}",
    ) {
        let result = transition(&state, &payload, &test_context(), Event::StoreFailed { error }).unwrap();
        prop_assert_eq!(result.new_state, DialogueState::Idle);
        prop_assert!(result.payload.is_empty());
        prop_assert_eq!(count_sends(&result.effects), 1);
    }
}

//! Pending-question registry
//!
//! A session holds at most one pending question. [`ask`] arms it and emits
//! its prompt; [`resolve`] consumes it before the continuation runs, so a
//! continuation that asks again is never clobbered by a late clear.

use super::effect::Effect;
use super::state::{DialogueState, Payload, Question, SessionContext};
use super::transition::TransitionResult;

/// Arm `question` for the session and send its prompt (exactly one message).
///
/// Any previously pending question is replaced.
pub fn ask(ctx: &SessionContext, question: Question, payload: Payload) -> TransitionResult {
    TransitionResult::new(DialogueState::AwaitingAnswer { question }, payload)
        .with_effect(Effect::send(ctx.chat_id, question.prompt()))
}

/// Take the pending question out of `state`, leaving it `Idle`.
///
/// Returns `None` when nothing was pending. A second call after a successful
/// one always returns `None`.
pub fn resolve(state: &mut DialogueState) -> Option<Question> {
    std::mem::take(state).pending()
}

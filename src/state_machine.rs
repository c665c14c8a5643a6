//! Per-user dialogue state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! the engine feeds an [`Event`] and the current session into
//! [`transition`] and executes the returned [`Effect`]s.

pub mod command;
mod effect;
pub mod event;
pub mod pending;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, LookupIntent};
pub use event::Event;
pub use state::{
    ChatId, DialogueState, Payload, PayloadError, Question, SessionContext, UserId,
};
pub use transition::{transition, TransitionError, TransitionResult};

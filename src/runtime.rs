//! Runtime for executing conversations
//!
//! Owns the session store and runs the effects the state machine asks for.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::{Engine, EngineConfig};
pub use traits::*;

use crate::menu::PersianCalendar;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Type alias for the production engine with concrete implementations
pub type ProductionEngine = Engine<DatabaseStorage, Arc<dyn Transport>, PersianCalendar>;

/// Periodically discard expired sessions until `cancel` fires
pub fn spawn_sweeper<S, T, L>(
    engine: Arc<Engine<S, T, L>>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    S: Storage + 'static,
    T: Transport + 'static,
    L: crate::menu::Localizer + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    engine.sweep_expired().await;
                }
            }
        }
        tracing::info!("Session sweeper stopped");
    })
}

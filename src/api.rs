//! HTTP API for the bot
//!
//! Inbound chat updates arrive here from the messaging gateway.

mod handlers;
mod types;

pub use handlers::create_router;

use crate::runtime::ProductionEngine;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ProductionEngine>,
}

impl AppState {
    pub fn new(engine: Arc<ProductionEngine>) -> Self {
        Self { engine }
    }
}

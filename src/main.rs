//! Meal bot - university meal reservation chat bot
//!
//! A Rust backend implementing a per-user dialogue state machine for
//! onboarding students and browsing the weekly food menu.

mod api;
mod config;
mod db;
mod menu;
mod runtime;
mod session;
mod state_machine;
mod ui;

use api::{create_router, AppState};
use config::BotConfig;
use db::Database;
use menu::PersianCalendar;
use runtime::{
    spawn_sweeper, DatabaseStorage, Engine, EngineConfig, HttpTransport, LogTransport,
    ProductionEngine, Transport,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meal_bot=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = BotConfig::from_env();

    // Ensure database directory exists
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Initialize database
    tracing::info!(path = %config.db_path.display(), "Opening database");
    let db = Database::open(&config.db_path)?;

    let transport: Arc<dyn Transport> = if let Some(url) = &config.outbound_url {
        tracing::info!(url = %url, "Delivering messages over HTTP");
        Arc::new(HttpTransport::new(url.clone(), config.send_timeout)?)
    } else {
        tracing::warn!("MEAL_BOT_OUTBOUND_URL not set; outbound messages are only logged");
        Arc::new(LogTransport)
    };

    let engine: Arc<ProductionEngine> = Arc::new(Engine::new(
        DatabaseStorage::new(db),
        transport,
        PersianCalendar,
        EngineConfig {
            session_ttl: config.session_ttl,
        },
    ));

    // Background session expiry
    let shutdown = CancellationToken::new();
    let sweeper = spawn_sweeper(engine.clone(), config.sweep_interval, shutdown.clone());

    let app = create_router(AppState::new(engine)).layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Meal bot listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let signal = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            signal.cancel();
        })
        .await?;

    shutdown.cancel();
    sweeper.await?;

    Ok(())
}

//! HTTP request handlers

use super::types::{ErrorResponse, InboundUpdate, QueuedResponse};
use super::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Chat updates
        .route("/api/updates", post(receive_update))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Updates
// ============================================================

async fn receive_update(
    State(state): State<AppState>,
    Json(update): Json<InboundUpdate>,
) -> Result<(StatusCode, Json<QueuedResponse>), AppError> {
    let (context, event) = update.into_parts().map_err(AppError::BadRequest)?;

    tracing::debug!(user_id = context.user_id, chat_id = context.chat_id, "Update received");

    // Handled on its own task; the caller does not wait for the reply
    let engine = state.engine.clone();
    tokio::spawn(async move {
        engine.handle(context, event).await;
    });

    Ok((StatusCode::ACCEPTED, Json(QueuedResponse { queued: true })))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("meal-bot ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

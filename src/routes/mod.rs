// src/routes/mod.rs
pub mod chat;

use std::any::Any;
use std::path::Path;

use crate::{error::ChatError, state::SharedState};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chat::{chat_handler, health_handler};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// `POST /chat`, `GET /health`, and everything else served from `static_dir`
/// (so `GET /` returns its `index.html`).
pub fn create_router(static_dir: impl AsRef<Path>) -> Router<SharedState> {
    Router::new()
        // The client replays its whole history on every turn, so no size cap.
        .route("/chat", post(chat_handler).layer(DefaultBodyLimit::disable()))
        .route("/health", get(health_handler))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "handler panicked".to_string());

    ChatError::Internal(detail).into_response()
}

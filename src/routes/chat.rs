use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    error::ChatError,
    message::{ChatRequest, ChatResponse, HealthResponse},
    services::{completion::CompletionError, prompt_builder::build_prompt},
    state::{AppState, SharedState},
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ChatError> {
    let request_id = Uuid::new_v4();

    respond(&state, payload)
        .instrument(tracing::info_span!("chat", %request_id))
        .await
        .map(Json)
}

async fn respond(
    state: &AppState,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<ChatResponse, ChatError> {
    // Readiness is checked before the body is even looked at.
    let Some(client) = state.completion.as_ref() else {
        return Err(ChatError::Unavailable);
    };

    let Json(payload) = payload.map_err(|e| ChatError::Internal(e.body_text()))?;

    let message = payload.message.trim();
    if message.is_empty() {
        return Err(ChatError::EmptyMessage);
    }

    let prompt = build_prompt(&payload.history, message);
    tracing::debug!(
        history_len = payload.history.len(),
        prompt_len = prompt.len(),
        model = client.model(),
        "generating reply"
    );

    let reply = client.generate(&prompt).await?;
    let reply = reply.trim();
    if reply.is_empty() {
        return Err(CompletionError::EmptyResponse.into());
    }

    tracing::info!(reply_len = reply.len(), "reply generated");
    Ok(ChatResponse::reply(reply))
}

pub async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_configured: state.model_configured(),
    })
}

// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ChatResponse;
use crate::services::completion::CompletionError;

pub const UNAVAILABLE_MESSAGE: &str = "AI service is currently unavailable. Please try again later.";
pub const EMPTY_MESSAGE: &str = "Please enter a message.";
pub const GENERATION_FAILED_MESSAGE: &str =
    "Sorry, I encountered an error generating a response. Please try again.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// Every way a chat request can fail. All of them are reported to the caller
/// as HTTP 200 with `success: false`; details only go to the log.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("completion client is not configured")]
    Unavailable,

    #[error("message is empty")]
    EmptyMessage,

    #[error("completion failed: {0}")]
    Generation(#[from] CompletionError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ChatError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ChatError::Unavailable => UNAVAILABLE_MESSAGE,
            ChatError::EmptyMessage => EMPTY_MESSAGE,
            ChatError::Generation(_) => GENERATION_FAILED_MESSAGE,
            ChatError::Internal(_) => INTERNAL_ERROR_MESSAGE,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        match &self {
            ChatError::EmptyMessage => tracing::debug!("rejected empty message"),
            ChatError::Unavailable => tracing::warn!("chat requested but AI service is unavailable"),
            ChatError::Generation(err) => tracing::error!(error = %err, "error generating response"),
            ChatError::Internal(err) => tracing::error!(error = %err, "error in chat endpoint"),
        }

        (StatusCode::OK, Json(ChatResponse::failure(self.user_message()))).into_response()
    }
}

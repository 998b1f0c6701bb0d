//! Completion service abstraction.
//!
//! The chat handler only sees [`CompletionClient`]; the Gemini REST client
//! lives in [`super::gemini`], tests plug in their own implementations.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("network error: {0}")]
    Network(String),

    #[error("provider returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("rate limited by provider")]
    RateLimited,

    #[error("response blocked: {0}")]
    Blocked(String),

    #[error("provider returned no text")]
    EmptyResponse,

    #[error("failed to decode provider response: {0}")]
    Decode(String),
}

/// A remote text-completion service.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate a reply for `prompt`. `Ok` always carries non-blank text.
    async fn generate(&self, prompt: &str) -> Result<String, CompletionError>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}

/// Sampling controls sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockThreshold {
    BlockLowAndAbove,
    BlockMediumAndAbove,
    BlockOnlyHigh,
    BlockNone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: BlockThreshold,
}

/// Medium-and-above blocking on every category we send.
pub fn default_safety_settings() -> Vec<SafetySetting> {
    [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ]
    .into_iter()
    .map(|category| SafetySetting {
        category,
        threshold: BlockThreshold::BlockMediumAndAbove,
    })
    .collect()
}

//! Gemini `generateContent` client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::completion::{
    CompletionClient, CompletionError, GenerationSettings, SafetySetting, default_safety_settings,
};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-pro";

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

pub struct GeminiClient {
    config: GeminiConfig,
    generation: GenerationSettings,
    safety: Vec<SafetySetting>,
    http: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().build()?;

        Ok(Self {
            config,
            generation: GenerationSettings::default(),
            safety: default_safety_settings(),
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: self.generation,
            safety_settings: &self.safety,
        };

        tracing::debug!(model = %self.config.model, prompt_len = prompt.len(), "sending generateContent");

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CompletionError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Decode(e.to_string()))?;

        extract_text(body)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

fn extract_text(body: GenerateContentResponse) -> Result<String, CompletionError> {
    if let Some(reason) = body.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(CompletionError::Blocked(reason));
    }

    let Some(candidate) = body.candidates.into_iter().next() else {
        return Err(CompletionError::EmptyResponse);
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if !text.trim().is_empty() {
        return Ok(text);
    }

    match candidate.finish_reason.as_deref() {
        Some(reason @ ("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT")) => {
            Err(CompletionError::Blocked(reason.to_string()))
        }
        _ => Err(CompletionError::EmptyResponse),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content>,
    generation_config: GenerationSettings,
    safety_settings: &'a [SafetySetting],
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

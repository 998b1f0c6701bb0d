use healthassist_backend::services::completion::{CompletionClient, CompletionError};
use healthassist_backend::services::gemini::{GeminiClient, GeminiConfig};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorded {
    calls: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

#[derive(Clone)]
struct MockProvider {
    status: StatusCode,
    reply: Value,
    recorded: Recorded,
}

async fn generate_content(
    State(mock): State<MockProvider>,
    Path(model_call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    mock.recorded.calls.lock().unwrap().push((model_call, key, body));
    (mock.status, Json(mock.reply))
}

async fn spawn_mock_provider(status: StatusCode, reply: Value) -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/v1beta/models/{model_call}", post(generate_content))
        .with_state(MockProvider {
            status,
            reply,
            recorded: recorded.clone(),
        });
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/v1beta"), recorded)
}

fn client(base_url: &str) -> GeminiClient {
    GeminiClient::new(GeminiConfig {
        api_key: "test-key".to_string(),
        model: "gemini-pro".to_string(),
        base_url: base_url.to_string(),
    })
    .unwrap()
}

fn text_reply(parts: &[&str]) -> Value {
    let parts: Vec<Value> = parts.iter().map(|t| json!({ "text": t })).collect();
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn sends_prompt_settings_and_credential() {
    let (base, recorded) = spawn_mock_provider(StatusCode::OK, text_reply(&["Stay ", "hydrated."])).await;

    let reply = client(&base).generate("What helps a headache?").await.unwrap();
    assert_eq!(reply, "Stay hydrated.");

    let calls = recorded.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (model_call, key, body) = &calls[0];
    assert_eq!(model_call, "gemini-pro:generateContent");
    assert_eq!(key.as_deref(), Some("test-key"));

    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "What helps a headache?");

    let generation = &body["generationConfig"];
    assert!((generation["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    assert!((generation["topP"].as_f64().unwrap() - 0.95).abs() < 1e-6);
    assert_eq!(generation["topK"], 40);
    assert_eq!(generation["maxOutputTokens"], 1024);

    let safety = body["safetySettings"].as_array().unwrap();
    let categories: Vec<&str> = safety.iter().map(|s| s["category"].as_str().unwrap()).collect();
    assert_eq!(
        categories,
        [
            "HARM_CATEGORY_HARASSMENT",
            "HARM_CATEGORY_HATE_SPEECH",
            "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            "HARM_CATEGORY_DANGEROUS_CONTENT",
        ]
    );
    assert!(safety.iter().all(|s| s["threshold"] == "BLOCK_MEDIUM_AND_ABOVE"));
}

#[tokio::test]
async fn rate_limit_is_distinguished() {
    let (base, _) = spawn_mock_provider(StatusCode::TOO_MANY_REQUESTS, json!({})).await;
    let err = client(&base).generate("hi").await.unwrap_err();
    assert!(matches!(err, CompletionError::RateLimited));
}

#[tokio::test]
async fn provider_error_carries_status() {
    let (base, _) = spawn_mock_provider(
        StatusCode::BAD_REQUEST,
        json!({ "error": { "message": "API key not valid" } }),
    )
    .await;
    let err = client(&base).generate("hi").await.unwrap_err();
    assert!(matches!(err, CompletionError::Api { status: 400, ref body } if body.contains("API key not valid")));
}

#[tokio::test]
async fn blocked_prompt_is_an_error() {
    let (base, _) = spawn_mock_provider(
        StatusCode::OK,
        json!({ "promptFeedback": { "blockReason": "SAFETY" } }),
    )
    .await;
    let err = client(&base).generate("hi").await.unwrap_err();
    assert!(matches!(err, CompletionError::Blocked(_)));
}

#[tokio::test]
async fn unreachable_provider_is_network_error() {
    let err = client("http://127.0.0.1:1/v1beta").generate("hi").await.unwrap_err();
    assert!(matches!(err, CompletionError::Network(_)));
}

// src/message.rs
use serde::{Deserialize, Deserializer, Serialize};

/// One prior user/assistant turn, echoed back by the client on every request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Exchange {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bot: String,
}

impl Exchange {
    pub fn new(user: impl Into<String>, bot: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            bot: bot.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    /// Missing or `null` reads as an empty message, so the caller gets the
    /// "Please enter a message." reply rather than the generic error.
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<Exchange>,
}

#[derive(Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub message: String,
}

impl ChatResponse {
    pub fn reply(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_configured: bool,
}

// Clients send `null` for absent fields as often as they omit them.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

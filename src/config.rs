// src/config.rs
use std::net::IpAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::services::gemini::{DEFAULT_MODEL, GEMINI_API_BASE, GeminiConfig};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub static_dir: PathBuf,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("static_dir", &self.static_dir)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = match get("HOST") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "HOST", value })?,
            None => IpAddr::from([0, 0, 0, 0]),
        };

        let port = match get("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value })?,
            None => 5000,
        };

        Ok(Self {
            host,
            port,
            static_dir: get("STATIC_DIR").unwrap_or_else(|| "public".to_string()).into(),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: get("GEMINI_API_BASE").unwrap_or_else(|| GEMINI_API_BASE.to_string()),
        })
    }

    /// Provider settings, or `None` when no credential was supplied.
    pub fn gemini(&self) -> Option<GeminiConfig> {
        self.gemini_api_key.as_ref().map(|api_key| GeminiConfig {
            api_key: api_key.clone(),
            model: self.gemini_model.clone(),
            base_url: self.gemini_base_url.clone(),
        })
    }
}

//! Model backend configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::OllamaConfig;

/// Embedding and generation backend configuration.
///
/// With `enabled = false` the router runs fully offline: deterministic
/// hashing embeddings and rule-based responses.
#[derive(Debug, Deserialize)]
pub struct AiConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the Ollama-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Optional bearer token for an authenticating proxy
    pub api_key: Option<Secret<String>>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Budget for one embedding call before falling back
    #[serde(default = "default_embedding_timeout")]
    pub embedding_timeout_ms: u64,

    /// Budget for one generation call before falling back
    #[serde(default = "default_generation_timeout")]
    pub generation_timeout_ms: u64,

    /// Maximum retries on transient failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl AiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn embedding_timeout(&self) -> Duration {
        Duration::from_millis(self.embedding_timeout_ms)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_millis(self.generation_timeout_ms)
    }

    /// Client settings for the Ollama adapter.
    pub fn ollama(&self) -> OllamaConfig {
        let config = OllamaConfig::new(self.base_url.as_str())
            .with_chat_model(self.chat_model.as_str())
            .with_embedding_model(self.embedding_model.as_str())
            .with_timeout(self.request_timeout())
            .with_max_retries(self.max_retries);
        match &self.api_key {
            Some(key) => config.with_api_key(Secret::new(key.expose_secret().clone())),
            None => config,
        }
    }

    /// Validate backend configuration. Nothing is checked while disabled.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.enabled {
            return Ok(());
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.chat_model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("ai.chat_model"));
        }
        if self.embedding_model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("ai.embedding_model"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("ai.request_timeout_secs"));
        }
        if self.embedding_timeout_ms == 0 {
            return Err(ValidationError::InvalidTimeout("ai.embedding_timeout_ms"));
        }
        if self.generation_timeout_ms == 0 {
            return Err(ValidationError::InvalidTimeout("ai.generation_timeout_ms"));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_base_url(),
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            api_key: None,
            request_timeout_secs: default_request_timeout(),
            embedding_timeout_ms: default_embedding_timeout(),
            generation_timeout_ms: default_generation_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_chat_model() -> String {
    "llama3.2".to_string()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_embedding_timeout() -> u64 {
    2_000
}

fn default_generation_timeout() -> u64 {
    10_000
}

fn default_retries() -> u32 {
    1
}

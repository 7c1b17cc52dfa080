//! Ollama adapter - embeddings and chat over the Ollama HTTP API.
//!
//! One client serves both ports:
//!
//! - `POST {base_url}/api/embeddings` with `{model, prompt}` for [`EmbeddingProvider`]
//! - `POST {base_url}/api/chat` with `{model, messages, stream: false}` for [`TextGenerator`]
//!
//! # Configuration
//!
//! ```ignore
//! let config = OllamaConfig::new("http://localhost:11434")
//!     .with_chat_model("llama3.2")
//!     .with_embedding_model("nomic-embed-text");
//!
//! let client = OllamaClient::new(config)?;
//! ```
//!
//! An API key is optional; when set it is sent as a bearer token, which is
//! what authenticating reverse proxies in front of Ollama expect.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{
    EmbeddingError, EmbeddingProvider, GenerationError, GenerationRequest, TextGenerator,
};

/// Configuration for the Ollama client.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Retries on transient failures.
    pub max_retries: u32,
    /// First backoff delay; doubles per retry.
    pub retry_backoff: Duration,
    api_key: Option<Secret<String>>,
}

impl OllamaConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            chat_model: "llama3.2".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 1,
            retry_backoff: Duration::from_millis(250),
            api_key: None,
        }
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_api_key(mut self, api_key: Secret<String>) -> Self {
        self.api_key = Some(api_key);
        self
    }
}

/// Ollama HTTP client.
pub struct OllamaClient {
    config: OllamaConfig,
    client: Client,
}

/// Failure classification shared by both endpoints before mapping to port errors.
#[derive(Debug, Clone, PartialEq)]
enum CallError {
    Timeout,
    Unavailable(String),
    RateLimited(u32),
    Invalid(String),
}

impl CallError {
    fn is_retryable(&self) -> bool {
        matches!(self, CallError::Timeout | CallError::Unavailable(_) | CallError::RateLimited(_))
    }
}

impl OllamaClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// - `DependencyUnavailable` if the HTTP client cannot be built
    pub fn new(config: OllamaConfig) -> Result<Self, DomainError> {
        let client = Client::builder().timeout(config.timeout).build().map_err(|e| {
            DomainError::new(
                ErrorCode::DependencyUnavailable,
                format!("Failed to create HTTP client: {}", e),
            )
        })?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn post_once<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<String, CallError> {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                CallError::Timeout
            } else {
                CallError::Unavailable(e.to_string())
            }
        })?;
        read_body(response).await
    }

    /// Posts with exponential backoff on transient failures.
    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<String, CallError> {
        let mut attempt = 0;
        loop {
            match self.post_once(path, body).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    tracing::debug!(path, attempt, error = ?err, "Retrying Ollama request");
                    sleep(self.config.retry_backoff * (1 << attempt)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

async fn read_body(response: Response) -> Result<String, CallError> {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    match classify_status(status, &body) {
        Some(err) => Err(err),
        None => Ok(body),
    }
}

fn classify_status(status: u16, body: &str) -> Option<CallError> {
    match status {
        200..=299 => None,
        429 => Some(CallError::RateLimited(5)),
        404 => Some(CallError::Unavailable(format!("model or endpoint not found: {}", body))),
        500..=599 => Some(CallError::Unavailable(format!("server error {}: {}", status, body))),
        _ => Some(CallError::Invalid(format!("unexpected status {}: {}", status, body))),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct EmbeddingRequestBody<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponseBody {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequestBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponseBody {
    message: ChatResponseMessage,
}

fn chat_body<'a>(model: &'a str, request: &'a GenerationRequest) -> ChatRequestBody<'a> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &request.system_prompt {
        messages.push(ChatMessage {
            role: "system",
            content: system,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: &request.prompt,
    });
    ChatRequestBody {
        model,
        messages,
        stream: false,
    }
}

fn parse_embedding(body: &str) -> Result<Vec<f32>, EmbeddingError> {
    let parsed: EmbeddingResponseBody = serde_json::from_str(body)
        .map_err(|e| EmbeddingError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
    if parsed.embedding.is_empty() {
        return Err(EmbeddingError::InvalidResponse("empty embedding".to_string()));
    }
    Ok(parsed.embedding)
}

fn parse_chat(body: &str) -> Result<String, GenerationError> {
    let parsed: ChatResponseBody = serde_json::from_str(body)
        .map_err(|e| GenerationError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
    let content = parsed.message.content.trim().to_string();
    if content.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(content)
}

#[async_trait]
impl EmbeddingProvider for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        let body = EmbeddingRequestBody {
            model: &self.config.embedding_model,
            prompt: text,
        };
        let raw = self.post("/api/embeddings", &body).await.map_err(|e| match e {
            CallError::Timeout => EmbeddingError::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            },
            CallError::Unavailable(m) => EmbeddingError::unavailable(m),
            CallError::RateLimited(s) => EmbeddingError::unavailable(format!("rate limited for {}s", s)),
            CallError::Invalid(m) => EmbeddingError::InvalidResponse(m),
        })?;
        parse_embedding(&raw)
    }

    fn provider_name(&self) -> &str {
        "ollama"
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let body = chat_body(&self.config.chat_model, &request);
        let raw = self.post("/api/chat", &body).await.map_err(|e| match e {
            CallError::Timeout => GenerationError::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            },
            CallError::Unavailable(m) => GenerationError::unavailable(m),
            CallError::RateLimited(s) => GenerationError::RateLimited { retry_after_secs: s },
            CallError::Invalid(m) => GenerationError::InvalidResponse(m),
        })?;
        parse_chat(&raw)
    }

    fn provider_name(&self) -> &str {
        "ollama"
    }
}

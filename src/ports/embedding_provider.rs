//! Embedding Provider Port - text to vector.
//!
//! Backs intent similarity, vector retrieval and semantic evaluation. Every
//! caller treats a failure as "embedding unavailable" and falls back.

use async_trait::async_trait;
use thiserror::Error;

/// Port for embedding generation.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Name used in logs.
    fn provider_name(&self) -> &str;
}

/// Errors from embedding providers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmbeddingError {
    /// Backend is down or not configured.
    #[error("embedding provider unavailable: {message}")]
    Unavailable { message: String },

    /// Call exceeded its time budget.
    #[error("embedding timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Backend answered with something that is not a usable vector.
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("cannot embed empty text")]
    EmptyInput,
}

impl EmbeddingError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

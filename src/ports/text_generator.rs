//! Text Generator Port - prompt to text.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::ConversationId;

/// Port for answer generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a reply for a fully rendered prompt.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;

    /// Name used in logs.
    fn provider_name(&self) -> &str;
}

/// A single generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_prompt: Option<String>,
    pub prompt: String,
    /// For tracing only.
    pub conversation_id: Option<ConversationId>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: None,
            prompt: prompt.into(),
            conversation_id: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn for_conversation(mut self, id: ConversationId) -> Self {
        self.conversation_id = Some(id);
        self
    }
}

/// Errors from text generators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("text generator unavailable: {message}")]
    Unavailable { message: String },

    #[error("generation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// The generator answered but produced no text.
    #[error("generator returned an empty response")]
    EmptyResponse,

    #[error("invalid generator response: {0}")]
    InvalidResponse(String),
}

impl GenerationError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

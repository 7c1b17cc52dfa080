//! Response composer - generators in order, then the rule-based responder.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::domain::foundation::ConversationId;
use crate::domain::routing::{
    compose_rule_response, PromptTemplate, ResponseSource, RetrievalResult, SYSTEM_PROMPT,
};
use crate::ports::{GenerationError, GenerationRequest, TextGenerator};

pub struct ResponseComposer {
    generators: Vec<Arc<dyn TextGenerator>>,
    timeout: Duration,
    snippet_chars: usize,
}

impl ResponseComposer {
    pub fn new(generators: Vec<Arc<dyn TextGenerator>>, timeout: Duration, snippet_chars: usize) -> Self {
        Self {
            generators,
            timeout,
            snippet_chars,
        }
    }

    /// Rules only; used when no generation backend is configured.
    pub fn rules_only(snippet_chars: usize) -> Self {
        Self::new(Vec::new(), Duration::ZERO, snippet_chars)
    }

    /// Composes an answer. The rule-based responder always produces one, so
    /// this never fails.
    pub async fn compose(
        &self,
        question: &str,
        retrieval: &RetrievalResult,
        template: &PromptTemplate,
        conversation_id: ConversationId,
    ) -> (String, ResponseSource) {
        let prompt = template.render(&retrieval.context, question);

        for generator in &self.generators {
            let request = GenerationRequest::new(prompt.clone())
                .with_system_prompt(SYSTEM_PROMPT)
                .for_conversation(conversation_id);
            match self.generate(generator.as_ref(), request).await {
                Ok(text) => return (text, ResponseSource::Generator),
                Err(err) => tracing::warn!(
                    conversation_id = %conversation_id,
                    provider = generator.provider_name(),
                    error = %err,
                    "Generation unavailable, trying next responder"
                ),
            }
        }

        (
            compose_rule_response(question, &retrieval.matches, self.snippet_chars),
            ResponseSource::Rules,
        )
    }

    async fn generate(
        &self,
        generator: &dyn TextGenerator,
        request: GenerationRequest,
    ) -> Result<String, GenerationError> {
        let text = match timeout(self.timeout, generator.generate(request)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(GenerationError::Timeout {
                    timeout_ms: self.timeout.as_millis() as u64,
                })
            }
        };
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}

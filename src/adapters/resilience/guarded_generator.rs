//! Text generator decorator that short-circuits while the backend is failing.
//!
//! ```ignore
//! let generator = GuardedGenerator::new(
//!     Arc::new(ollama),
//!     Arc::new(InMemoryCircuitBreaker::new(CircuitBreakerConfig::for_ai_provider())),
//! );
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::ports::{CircuitBreaker, GenerationError, GenerationRequest, TextGenerator};

pub struct GuardedGenerator {
    inner: Arc<dyn TextGenerator>,
    breaker: Arc<dyn CircuitBreaker>,
}

impl GuardedGenerator {
    pub fn new(inner: Arc<dyn TextGenerator>, breaker: Arc<dyn CircuitBreaker>) -> Self {
        Self { inner, breaker }
    }

    pub fn breaker(&self) -> &Arc<dyn CircuitBreaker> {
        &self.breaker
    }
}

#[async_trait]
impl TextGenerator for GuardedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        if !self.breaker.should_allow() {
            return Err(GenerationError::unavailable(format!(
                "circuit open for {}",
                self.inner.provider_name()
            )));
        }

        match self.inner.generate(request).await {
            Ok(text) => {
                self.breaker.record_success();
                Ok(text)
            }
            Err(err) => {
                // An empty answer means the backend is up.
                if err.is_retryable() {
                    self.breaker.record_failure();
                }
                Err(err)
            }
        }
    }

    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::ScriptedGenerator;
    use crate::adapters::resilience::InMemoryCircuitBreaker;
    use crate::ports::{CircuitBreakerConfig, CircuitState};
    use std::time::Duration;

    fn guarded(inner: ScriptedGenerator) -> (GuardedGenerator, ScriptedGenerator) {
        let breaker = InMemoryCircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 2,
            recovery_timeout: Duration::from_secs(60),
            success_threshold: 1,
        });
        (
            GuardedGenerator::new(Arc::new(inner.clone()), Arc::new(breaker)),
            inner,
        )
    }

    #[tokio::test]
    async fn open_circuit_skips_backend() {
        let (generator, inner) = guarded(ScriptedGenerator::unavailable());

        for _ in 0..2 {
            assert!(generator.generate(GenerationRequest::new("q")).await.is_err());
        }
        assert_eq!(generator.breaker().state(), CircuitState::Open);

        let err = generator.generate(GenerationRequest::new("q")).await.unwrap_err();
        assert!(err.to_string().contains("circuit open"));
        assert_eq!(inner.call_count(), 2);
    }

    #[tokio::test]
    async fn empty_responses_do_not_trip_the_circuit() {
        let (generator, _) = guarded(
            ScriptedGenerator::new().with_fallback(Err(GenerationError::EmptyResponse)),
        );
        for _ in 0..3 {
            let _ = generator.generate(GenerationRequest::new("q")).await;
        }
        assert_eq!(generator.breaker().state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn passes_successful_answers_through() {
        let (generator, _) = guarded(ScriptedGenerator::new().with_response("hello"));
        assert_eq!(
            generator.generate(GenerationRequest::new("q")).await.unwrap(),
            "hello"
        );
        assert_eq!(generator.breaker().metrics().total_successes, 1);
    }
}

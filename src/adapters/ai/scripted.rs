//! Scripted model backends for tests and offline runs.
//!
//! Both doubles replay queued outcomes in order, record every call, and can
//! simulate latency so callers' timeouts and fallbacks can be exercised.
//!
//! # Example
//!
//! ```ignore
//! let generator = ScriptedGenerator::new()
//!     .with_response("Our return window is 30 days.")
//!     .with_error(GenerationError::unavailable("down"));
//!
//! assert_eq!(generator.generate(request).await?, "Our return window is 30 days.");
//! assert!(generator.generate(request).await.is_err());
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    EmbeddingError, EmbeddingProvider, GenerationError, GenerationRequest, TextGenerator,
};

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Text generator that replays queued outcomes.
///
/// With an empty queue it answers with the fallback outcome, which defaults
/// to an echo of the question-free prompt tail so responses stay traceable.
#[derive(Debug, Clone)]
pub struct ScriptedGenerator {
    responses: Arc<Mutex<VecDeque<Result<String, GenerationError>>>>,
    fallback: Option<Result<String, GenerationError>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl Default for ScriptedGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            fallback: None,
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A generator that always fails as unavailable.
    pub fn unavailable() -> Self {
        Self::new().with_fallback(Err(GenerationError::unavailable("scripted outage")))
    }

    /// Queues a successful response.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        locked(&self.responses).push_back(Ok(content.into()));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: GenerationError) -> Self {
        locked(&self.responses).push_back(Err(error));
        self
    }

    /// Outcome once the queue is drained.
    pub fn with_fallback(mut self, outcome: Result<String, GenerationError>) -> Self {
        self.fallback = Some(outcome);
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        locked(&self.calls).len()
    }

    pub fn get_calls(&self) -> Vec<GenerationRequest> {
        locked(&self.calls).clone()
    }

    fn next_outcome(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        if let Some(outcome) = locked(&self.responses).pop_front() {
            return outcome;
        }
        match &self.fallback {
            Some(outcome) => outcome.clone(),
            None => Ok(format!("Scripted answer for: {}", last_line(&request.prompt))),
        }
    }
}

fn last_line(prompt: &str) -> &str {
    prompt.trim().lines().last().unwrap_or_default().trim()
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        locked(&self.calls).push(request.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.next_outcome(&request)
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

/// Embedding provider returning fixed vectors per exact text.
///
/// Unknown texts get the default vector when one is configured, otherwise
/// the call fails as unavailable.
#[derive(Debug, Clone)]
pub struct ScriptedEmbedder {
    vectors: Arc<Mutex<HashMap<String, Vec<f32>>>>,
    default_vector: Option<Vec<f32>>,
    failing: bool,
    delay: Duration,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Default for ScriptedEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedEmbedder {
    pub fn new() -> Self {
        Self {
            vectors: Arc::new(Mutex::new(HashMap::new())),
            default_vector: None,
            failing: false,
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// An embedder whose every call fails.
    pub fn unavailable() -> Self {
        Self {
            failing: true,
            ..Self::new()
        }
    }

    pub fn with_vector(self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        locked(&self.vectors).insert(text.into(), vector);
        self
    }

    pub fn with_default_vector(mut self, vector: Vec<f32>) -> Self {
        self.default_vector = Some(vector);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        locked(&self.calls).len()
    }

    pub fn get_calls(&self) -> Vec<String> {
        locked(&self.calls).clone()
    }
}

#[async_trait]
impl EmbeddingProvider for ScriptedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        locked(&self.calls).push(text.to_string());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        if self.failing {
            return Err(EmbeddingError::unavailable("scripted outage"));
        }

        locked(&self.vectors)
            .get(text)
            .cloned()
            .or_else(|| self.default_vector.clone())
            .ok_or_else(|| EmbeddingError::unavailable(format!("no scripted vector for '{}'", text)))
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

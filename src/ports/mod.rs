//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the routing core and the outside world. Adapters implement these ports.
//!
//! ## Model Ports
//!
//! - `EmbeddingProvider` - text to vector
//! - `TextGenerator` - prompt to text
//! - `VectorIndex` - nearest-neighbour search over article vectors
//! - `CircuitBreaker` - resilience around model backends
//!
//! ## Storage Ports
//!
//! - `ConversationRepository` - conversations and messages
//! - `KnowledgeRepository` - knowledge articles
//! - `FeedbackRepository` - feedback and training records
//! - `EvaluationRepository` - per-message evaluation records
//! - `ExperimentRepository` - experiments and configuration variants
//! - `AgentActivityRepository` - agent actions and corrections

mod agent_activity_repository;
mod circuit_breaker;
mod conversation_repository;
mod embedding_provider;
mod evaluation_repository;
mod experiment_repository;
mod feedback_repository;
mod knowledge_repository;
mod text_generator;
mod vector_index;

pub use agent_activity_repository::AgentActivityRepository;
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerMetrics, CircuitState};
pub use conversation_repository::ConversationRepository;
pub use embedding_provider::{EmbeddingError, EmbeddingProvider};
pub use evaluation_repository::EvaluationRepository;
pub use experiment_repository::ExperimentRepository;
pub use feedback_repository::FeedbackRepository;
pub use knowledge_repository::KnowledgeRepository;
pub use text_generator::{GenerationError, GenerationRequest, TextGenerator};
pub use vector_index::{IndexError, Neighbor, VectorIndex};

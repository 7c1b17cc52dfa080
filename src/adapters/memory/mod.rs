//! In-memory adapters for every storage port plus the vector index.
//!
//! Used by tests, the demo binary, and single-process deployments.

mod agent_activity;
mod conversations;
mod evaluations;
mod experiments;
mod feedback;
mod knowledge;
mod vector_index;

pub use agent_activity::InMemoryAgentActivityRepository;
pub use conversations::InMemoryConversationRepository;
pub use evaluations::InMemoryEvaluationRepository;
pub use experiments::InMemoryExperimentRepository;
pub use feedback::InMemoryFeedbackRepository;
pub use knowledge::InMemoryKnowledgeRepository;
pub use vector_index::InMemoryVectorIndex;

//! Application services shared by the handlers.
//!
//! Each service owns one concern of the per-message path and degrades to
//! its fallback instead of failing when a model backend is unavailable.

mod feedback_converter;
mod intent_classifier;
mod knowledge_index;
mod knowledge_retriever;
mod response_composer;
mod response_evaluator;
mod similarity_engine;

pub use feedback_converter::FeedbackConverter;
pub use intent_classifier::IntentClassifier;
pub use knowledge_index::{EmbedOutcome, KnowledgeIndex};
pub use knowledge_retriever::{KnowledgeRetriever, RetrievalSettings};
pub use response_composer::ResponseComposer;
pub use response_evaluator::ResponseEvaluator;
pub use similarity_engine::{IntentExampleCache, SimilarityEngine};

//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the support routing domain.

mod confidence;
mod errors;
mod ids;
mod state_machine;
mod time_window;
mod timestamp;

pub use confidence::Confidence;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    ActivityId, ArticleId, ConversationId, CustomerId, EvaluationRecordId, ExperimentId,
    FeedbackId, MessageId, TrainingRecordId, VariantId,
};
pub use state_machine::StateMachine;
pub use time_window::TimeWindow;
pub use timestamp::Timestamp;

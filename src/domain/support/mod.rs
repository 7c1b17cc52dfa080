//! Support domain - conversations, knowledge, feedback and experiments.

mod agent_activity;
mod article;
mod conversation;
mod evaluation;
mod experiment;
mod feedback;
mod message;
mod training;

pub use agent_activity::{
    diff_summary, AgentAction, AgentActionType, Correction, DIFF_SUMMARY_LINES, NO_CHANGES,
};
pub use article::{ArticleEmbedding, KnowledgeArticle};
pub use conversation::{Conversation, ConversationStatus, SatisfactionScore, VariantAssignment};
pub use evaluation::EvaluationRecord;
pub use experiment::{ConfigVariant, Experiment, ExperimentStatus};
pub use feedback::{Feedback, FeedbackRating};
pub use message::{AgentType, Message, MessageType, ResponseMeta};
pub use training::{TrainingExample, TrainingRecord};

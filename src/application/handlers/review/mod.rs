//! Agent review handlers - the action log, corrections, performance and export.

mod agent_performance;
mod export_conversation;
mod record_agent_action;
mod record_correction;

pub use agent_performance::{AgentPerformance, AgentPerformanceHandler, AgentPerformanceQuery};
pub use export_conversation::{ConversationExport, ExportConversationHandler, ExportConversationQuery};
pub use record_agent_action::{RecordAgentActionCommand, RecordAgentActionHandler};
pub use record_correction::{RecordCorrectionCommand, RecordCorrectionHandler, RecordCorrectionResult};

use crate::domain::foundation::{ConversationId, DomainError, ErrorCode, MessageId};
use crate::domain::support::{Conversation, Message};
use crate::ports::ConversationRepository;

async fn load_conversation(
    repo: &dyn ConversationRepository,
    id: &ConversationId,
) -> Result<Conversation, DomainError> {
    repo.find_by_id(id).await?.ok_or_else(|| {
        DomainError::new(ErrorCode::ConversationNotFound, "Conversation not found")
            .with_detail("conversation_id", id.to_string())
    })
}

async fn load_message(repo: &dyn ConversationRepository, id: &MessageId) -> Result<Message, DomainError> {
    repo.find_message(id).await?.ok_or_else(|| {
        DomainError::new(ErrorCode::MessageNotFound, "Message not found")
            .with_detail("message_id", id.to_string())
    })
}

//! RecordCorrectionHandler - Command handler for an agent rewriting a draft.
//!
//! The draft is edited in place, keeping its first automated text, and the
//! correction is logged with a diff summary alongside an `edit` action.

use std::sync::Arc;

use super::{load_conversation, load_message};
use crate::domain::foundation::{DomainError, MessageId};
use crate::domain::support::{AgentAction, AgentActionType, Correction, Message};
use crate::ports::{AgentActivityRepository, ConversationRepository};

#[derive(Debug, Clone)]
pub struct RecordCorrectionCommand {
    pub message_id: MessageId,
    pub corrected_content: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RecordCorrectionResult {
    pub message: Message,
    pub correction: Correction,
}

pub struct RecordCorrectionHandler {
    conversations: Arc<dyn ConversationRepository>,
    activity: Arc<dyn AgentActivityRepository>,
}

impl RecordCorrectionHandler {
    pub fn new(conversations: Arc<dyn ConversationRepository>, activity: Arc<dyn AgentActivityRepository>) -> Self {
        Self {
            conversations,
            activity,
        }
    }

    /// # Errors
    ///
    /// - `MessageNotFound` if the message doesn't exist
    /// - `ConversationArchived` once the conversation is resolved
    /// - `ValidationFailed` for blank content or a message no longer pending review
    pub async fn handle(&self, cmd: RecordCorrectionCommand) -> Result<RecordCorrectionResult, DomainError> {
        let mut message = load_message(self.conversations.as_ref(), &cmd.message_id).await?;
        let conversation_id = *message.conversation_id();
        load_conversation(self.conversations.as_ref(), &conversation_id)
            .await?
            .ensure_mutable()?;

        let before = message.content().to_string();
        message.edit(cmd.corrected_content.clone())?;
        self.conversations.update_message(&message).await?;

        let correction = Correction::new(
            cmd.message_id,
            conversation_id,
            before,
            cmd.corrected_content,
            cmd.reason,
        );
        self.activity.record_correction(&correction).await?;

        let action = AgentAction::new(conversation_id, AgentActionType::Edit)
            .on_message(cmd.message_id)
            .with_payload(serde_json::json!({ "correction_id": correction.id }));
        self.activity.record_action(&action).await?;

        tracing::info!(
            conversation_id = %conversation_id,
            message_id = %cmd.message_id,
            "Correction recorded"
        );
        Ok(RecordCorrectionResult { message, correction })
    }
}

//! ExportConversationHandler - Query handler for a full conversation transcript.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::load_conversation;
use crate::domain::foundation::{ConversationId, CustomerId, DomainError};
use crate::domain::support::{AgentAction, ConversationStatus, Correction, Message, VariantAssignment};
use crate::ports::{AgentActivityRepository, ConversationRepository};

#[derive(Debug, Clone)]
pub struct ExportConversationQuery {
    pub conversation_id: ConversationId,
}

/// Everything recorded about one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationExport {
    pub conversation_id: ConversationId,
    pub customer_id: CustomerId,
    pub status: ConversationStatus,
    pub csat_score: Option<u8>,
    pub variant: Option<VariantAssignment>,
    /// Oldest first.
    pub messages: Vec<Message>,
    pub corrections: Vec<Correction>,
    pub agent_actions: Vec<AgentAction>,
}

impl ConversationExport {
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

pub struct ExportConversationHandler {
    conversations: Arc<dyn ConversationRepository>,
    activity: Arc<dyn AgentActivityRepository>,
}

impl ExportConversationHandler {
    pub fn new(conversations: Arc<dyn ConversationRepository>, activity: Arc<dyn AgentActivityRepository>) -> Self {
        Self {
            conversations,
            activity,
        }
    }

    pub async fn handle(&self, query: ExportConversationQuery) -> Result<ConversationExport, DomainError> {
        let conversation = load_conversation(self.conversations.as_ref(), &query.conversation_id).await?;

        Ok(ConversationExport {
            conversation_id: query.conversation_id,
            customer_id: conversation.customer_id().clone(),
            status: conversation.status(),
            csat_score: conversation.satisfaction().map(|s| s.value()),
            variant: conversation.assignment().copied(),
            messages: self.conversations.messages_for(&query.conversation_id).await?,
            corrections: self.activity.corrections_for(&query.conversation_id).await?,
            agent_actions: self.activity.actions_for(&query.conversation_id).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryAgentActivityRepository, InMemoryConversationRepository};
    use crate::domain::foundation::{ErrorCode, MessageId};
    use crate::domain::support::{AgentActionType, Conversation, SatisfactionScore};

    #[tokio::test]
    async fn exports_transcript_and_review_log() {
        let conversations = Arc::new(InMemoryConversationRepository::new());
        let activity = Arc::new(InMemoryAgentActivityRepository::new());

        let mut conversation = Conversation::start(CustomerId::new("cust-42").unwrap());
        conversation.rate(SatisfactionScore::new(5).unwrap());
        let id = *conversation.id();
        conversations.save(&conversation).await.unwrap();
        conversations
            .add_message(&Message::customer(id, "Thanks!").unwrap())
            .await
            .unwrap();
        activity
            .record_action(&AgentAction::new(id, AgentActionType::Resolve))
            .await
            .unwrap();
        activity
            .record_correction(&Correction::new(MessageId::new(), id, "old", "new", None))
            .await
            .unwrap();

        let export = ExportConversationHandler::new(conversations, activity)
            .handle(ExportConversationQuery { conversation_id: id })
            .await
            .unwrap();
        let json = export.to_json().unwrap();

        assert_eq!(json["customer_id"], "cust-42");
        assert_eq!(json["status"], "active");
        assert_eq!(json["csat_score"], 5);
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["corrections"].as_array().unwrap().len(), 1);
        assert_eq!(json["agent_actions"][0]["action"], "resolve");
    }

    #[tokio::test]
    async fn unknown_conversation_is_not_found() {
        let err = ExportConversationHandler::new(
            Arc::new(InMemoryConversationRepository::new()),
            Arc::new(InMemoryAgentActivityRepository::new()),
        )
        .handle(ExportConversationQuery {
            conversation_id: ConversationId::new(),
        })
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConversationNotFound);
    }
}

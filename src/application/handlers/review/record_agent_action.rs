//! RecordAgentActionHandler - Command handler for an agent's review action.
//!
//! Logs the action and applies its effect: approving delivers a pending
//! draft, escalating and resolving move the conversation. Edits arrive
//! through `RecordCorrectionHandler`; rejections are logged only.

use std::sync::Arc;

use super::{load_conversation, load_message};
use crate::domain::foundation::{ConversationId, DomainError, ErrorCode, MessageId};
use crate::domain::support::{AgentAction, AgentActionType};
use crate::ports::{AgentActivityRepository, ConversationRepository};

#[derive(Debug, Clone)]
pub struct RecordAgentActionCommand {
    pub conversation_id: ConversationId,
    pub message_id: Option<MessageId>,
    pub action: AgentActionType,
    pub payload: Option<serde_json::Value>,
}

impl RecordAgentActionCommand {
    pub fn new(conversation_id: ConversationId, action: AgentActionType) -> Self {
        Self {
            conversation_id,
            message_id: None,
            action,
            payload: None,
        }
    }

    pub fn on_message(mut self, message_id: MessageId) -> Self {
        self.message_id = Some(message_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

pub struct RecordAgentActionHandler {
    conversations: Arc<dyn ConversationRepository>,
    activity: Arc<dyn AgentActivityRepository>,
}

impl RecordAgentActionHandler {
    pub fn new(conversations: Arc<dyn ConversationRepository>, activity: Arc<dyn AgentActivityRepository>) -> Self {
        Self {
            conversations,
            activity,
        }
    }

    pub async fn handle(&self, cmd: RecordAgentActionCommand) -> Result<AgentAction, DomainError> {
        let mut conversation = load_conversation(self.conversations.as_ref(), &cmd.conversation_id).await?;

        let message = match cmd.message_id {
            Some(id) => {
                let message = load_message(self.conversations.as_ref(), &id).await?;
                if *message.conversation_id() != cmd.conversation_id {
                    return Err(DomainError::new(ErrorCode::MessageNotFound, "Message not found in conversation")
                        .with_detail("message_id", id.to_string()));
                }
                Some(message)
            }
            None => None,
        };

        match cmd.action {
            AgentActionType::Approve => {
                let Some(mut message) = message else {
                    return Err(DomainError::validation("message_id", "Approving requires a message"));
                };
                conversation.ensure_mutable()?;
                message.approve()?;
                self.conversations.update_message(&message).await?;
            }
            AgentActionType::Escalate => {
                conversation.escalate()?;
                self.conversations.update(&conversation).await?;
            }
            AgentActionType::Resolve => {
                conversation.resolve()?;
                self.conversations.update(&conversation).await?;
            }
            AgentActionType::Edit | AgentActionType::Reject => {}
        }

        let mut action = AgentAction::new(cmd.conversation_id, cmd.action);
        if let Some(id) = cmd.message_id {
            action = action.on_message(id);
        }
        if let Some(payload) = cmd.payload {
            action = action.with_payload(payload);
        }
        self.activity.record_action(&action).await?;

        tracing::info!(
            conversation_id = %cmd.conversation_id,
            action = %cmd.action,
            "Agent action recorded"
        );
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryAgentActivityRepository, InMemoryConversationRepository};
    use crate::domain::foundation::{Confidence, CustomerId, TimeWindow};
    use crate::domain::routing::IntentCategory;
    use crate::domain::support::{AgentType, Conversation, ConversationStatus, Message, MessageType, ResponseMeta};

    struct Fixture {
        conversations: Arc<InMemoryConversationRepository>,
        activity: Arc<InMemoryAgentActivityRepository>,
        handler: RecordAgentActionHandler,
        conversation_id: ConversationId,
        draft_id: MessageId,
    }

    async fn fixture() -> Fixture {
        let conversations = Arc::new(InMemoryConversationRepository::new());
        let activity = Arc::new(InMemoryAgentActivityRepository::new());
        let conversation = Conversation::start(CustomerId::new("c").unwrap());
        let conversation_id = *conversation.id();
        conversations.save(&conversation).await.unwrap();
        let question = Message::customer(conversation_id, "How long is shipping?").unwrap();
        conversations.add_message(&question).await.unwrap();
        let draft = Message::response(
            conversation_id,
            "Around a week.",
            ResponseMeta {
                reply_to: *question.id(),
                confidence: Confidence::new(0.4),
                intent: IntentCategory::Faq,
                agent_type: AgentType::Knowledge,
                articles: vec![],
                auto_sent: false,
            },
        )
        .unwrap();
        conversations.add_message(&draft).await.unwrap();

        Fixture {
            handler: RecordAgentActionHandler::new(conversations.clone(), activity.clone()),
            conversations,
            activity,
            conversation_id,
            draft_id: *draft.id(),
        }
    }

    #[tokio::test]
    async fn approval_delivers_draft_and_is_logged() {
        let f = fixture().await;
        f.handler
            .handle(
                RecordAgentActionCommand::new(f.conversation_id, AgentActionType::Approve)
                    .on_message(f.draft_id)
                    .with_payload(serde_json::json!({"agent": "sam"})),
            )
            .await
            .unwrap();

        let message = f.conversations.find_message(&f.draft_id).await.unwrap().unwrap();
        assert_eq!(message.message_type(), MessageType::Final);
        let actions = f.activity.actions_for(&f.conversation_id).await.unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].payload, Some(serde_json::json!({"agent": "sam"})));
    }

    #[tokio::test]
    async fn approval_without_message_is_rejected() {
        let f = fixture().await;
        let err = f
            .handler
            .handle(RecordAgentActionCommand::new(f.conversation_id, AgentActionType::Approve))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(f
            .activity
            .actions_in(&TimeWindow::unbounded())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn resolve_archives_conversation() {
        let f = fixture().await;
        f.handler
            .handle(RecordAgentActionCommand::new(f.conversation_id, AgentActionType::Resolve))
            .await
            .unwrap();

        let conversation = f.conversations.find_by_id(&f.conversation_id).await.unwrap().unwrap();
        assert_eq!(conversation.status(), ConversationStatus::Resolved);

        let err = f
            .handler
            .handle(RecordAgentActionCommand::new(f.conversation_id, AgentActionType::Escalate))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn rejection_is_only_logged() {
        let f = fixture().await;
        f.handler
            .handle(RecordAgentActionCommand::new(f.conversation_id, AgentActionType::Reject).on_message(f.draft_id))
            .await
            .unwrap();

        let message = f.conversations.find_message(&f.draft_id).await.unwrap().unwrap();
        assert_eq!(message.message_type(), MessageType::Draft);
    }
}

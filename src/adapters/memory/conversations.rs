//! In-memory conversation and message storage.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{
    ConversationId, DomainError, ErrorCode, ExperimentId, MessageId, TimeWindow, VariantId,
};
use crate::domain::support::{Conversation, Message};
use crate::ports::ConversationRepository;

/// In-memory storage for conversations and their messages.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationRepository {
    conversations: Arc<RwLock<HashMap<ConversationId, Conversation>>>,
    messages: Arc<RwLock<Vec<Message>>>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations.
    pub async fn conversation_count(&self) -> usize {
        self.conversations.read().await.len()
    }

    /// Number of stored messages across all conversations.
    pub async fn message_count(&self) -> usize {
        self.messages.read().await.len()
    }
}

fn not_found(id: &ConversationId) -> DomainError {
    DomainError::new(ErrorCode::ConversationNotFound, "Conversation not found")
        .with_detail("conversation_id", id.to_string())
}

fn sorted_by_creation(mut conversations: Vec<Conversation>) -> Vec<Conversation> {
    conversations.sort_by(|a, b| a.created_at().cmp(b.created_at()));
    conversations
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn save(&self, conversation: &Conversation) -> Result<(), DomainError> {
        let mut conversations = self.conversations.write().await;
        if conversations.contains_key(conversation.id()) {
            return Err(DomainError::new(
                ErrorCode::StorageError,
                "Conversation already exists",
            )
            .with_detail("conversation_id", conversation.id().to_string()));
        }
        conversations.insert(*conversation.id(), conversation.clone());
        Ok(())
    }

    async fn update(&self, conversation: &Conversation) -> Result<(), DomainError> {
        let mut conversations = self.conversations.write().await;
        match conversations.get_mut(conversation.id()) {
            Some(stored) => {
                *stored = conversation.clone();
                Ok(())
            }
            None => Err(not_found(conversation.id())),
        }
    }

    async fn find_by_id(&self, id: &ConversationId) -> Result<Option<Conversation>, DomainError> {
        Ok(self.conversations.read().await.get(id).cloned())
    }

    async fn list_created_in(&self, window: &TimeWindow) -> Result<Vec<Conversation>, DomainError> {
        let conversations = self.conversations.read().await;
        Ok(sorted_by_creation(
            conversations
                .values()
                .filter(|c| window.contains(c.created_at()))
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_variant(
        &self,
        experiment_id: &ExperimentId,
        variant_id: &VariantId,
    ) -> Result<Vec<Conversation>, DomainError> {
        let conversations = self.conversations.read().await;
        Ok(sorted_by_creation(
            conversations
                .values()
                .filter(|c| {
                    c.assignment().map_or(false, |a| {
                        a.experiment_id == *experiment_id && a.variant_id == *variant_id
                    })
                })
                .cloned()
                .collect(),
        ))
    }

    async fn add_message(&self, message: &Message) -> Result<(), DomainError> {
        if !self
            .conversations
            .read()
            .await
            .contains_key(message.conversation_id())
        {
            return Err(not_found(message.conversation_id()));
        }
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn update_message(&self, message: &Message) -> Result<(), DomainError> {
        let mut messages = self.messages.write().await;
        match messages.iter_mut().find(|m| m.id() == message.id()) {
            Some(stored) => {
                *stored = message.clone();
                Ok(())
            }
            None => Err(DomainError::new(ErrorCode::MessageNotFound, "Message not found")
                .with_detail("message_id", message.id().to_string())),
        }
    }

    async fn find_message(&self, id: &MessageId) -> Result<Option<Message>, DomainError> {
        Ok(self
            .messages
            .read()
            .await
            .iter()
            .find(|m| m.id() == id)
            .cloned())
    }

    async fn messages_for(&self, conversation_id: &ConversationId) -> Result<Vec<Message>, DomainError> {
        Ok(self
            .messages
            .read()
            .await
            .iter()
            .filter(|m| m.conversation_id() == conversation_id)
            .cloned()
            .collect())
    }

    async fn list_messages_in(&self, window: &TimeWindow) -> Result<Vec<Message>, DomainError> {
        Ok(self
            .messages
            .read()
            .await
            .iter()
            .filter(|m| window.contains(m.created_at()))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{CustomerId, Timestamp};
    use crate::domain::support::VariantAssignment;

    fn conversation() -> Conversation {
        Conversation::start(CustomerId::new("cust-1").unwrap())
    }

    #[tokio::test]
    async fn saves_and_finds_conversation() {
        let repo = InMemoryConversationRepository::new();
        let conv = conversation();
        repo.save(&conv).await.unwrap();

        assert_eq!(repo.find_by_id(conv.id()).await.unwrap(), Some(conv.clone()));
        assert!(repo.save(&conv).await.is_err());
    }

    #[tokio::test]
    async fn update_of_unknown_conversation_fails() {
        let repo = InMemoryConversationRepository::new();
        let err = repo.update(&conversation()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConversationNotFound);
    }

    #[tokio::test]
    async fn messages_require_their_conversation() {
        let repo = InMemoryConversationRepository::new();
        let conv = conversation();
        let orphan = Message::customer(*conv.id(), "hello").unwrap();
        assert!(repo.add_message(&orphan).await.is_err());

        repo.save(&conv).await.unwrap();
        repo.add_message(&orphan).await.unwrap();
        repo.add_message(&Message::customer(*conv.id(), "again").unwrap())
            .await
            .unwrap();

        let messages = repo.messages_for(conv.id()).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content(), "hello");
    }

    #[tokio::test]
    async fn window_filter_uses_creation_time() {
        let repo = InMemoryConversationRepository::new();
        let old = conversation().with_created_at(Timestamp::now().minus_days(30));
        let recent = conversation();
        repo.save(&old).await.unwrap();
        repo.save(&recent).await.unwrap();

        let found = repo.list_created_in(&TimeWindow::last_days(7)).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), recent.id());
    }

    #[tokio::test]
    async fn lists_conversations_by_variant() {
        let repo = InMemoryConversationRepository::new();
        let assignment = VariantAssignment {
            experiment_id: ExperimentId::new(),
            variant_id: VariantId::new(),
        };
        let mut assigned = conversation();
        assigned.assign_variant(assignment).unwrap();
        repo.save(&assigned).await.unwrap();
        repo.save(&conversation()).await.unwrap();

        let found = repo
            .list_by_variant(&assignment.experiment_id, &assignment.variant_id)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }
}

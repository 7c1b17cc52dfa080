//! Conversation repository port.
//!
//! Persists Conversation aggregates and the Messages they own. Messages are
//! append-only; `update_message` exists for the draft review workflow.

use async_trait::async_trait;

use crate::domain::foundation::{
    ConversationId, DomainError, ExperimentId, MessageId, TimeWindow, VariantId,
};
use crate::domain::support::{Conversation, Message};

/// Repository port for conversations and their messages.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Save a new conversation.
    async fn save(&self, conversation: &Conversation) -> Result<(), DomainError>;

    /// Update an existing conversation.
    ///
    /// # Errors
    ///
    /// - `ConversationNotFound` if conversation doesn't exist
    async fn update(&self, conversation: &Conversation) -> Result<(), DomainError>;

    /// Find a conversation by its ID.
    async fn find_by_id(&self, id: &ConversationId) -> Result<Option<Conversation>, DomainError>;

    /// Conversations created inside the window.
    async fn list_created_in(&self, window: &TimeWindow) -> Result<Vec<Conversation>, DomainError>;

    /// Conversations assigned to a variant of an experiment.
    async fn list_by_variant(
        &self,
        experiment_id: &ExperimentId,
        variant_id: &VariantId,
    ) -> Result<Vec<Conversation>, DomainError>;

    /// Append a message to its conversation.
    ///
    /// # Errors
    ///
    /// - `ConversationNotFound` if the owning conversation doesn't exist
    async fn add_message(&self, message: &Message) -> Result<(), DomainError>;

    /// Replace a stored message (draft edits and approvals).
    ///
    /// # Errors
    ///
    /// - `MessageNotFound` if the message doesn't exist
    async fn update_message(&self, message: &Message) -> Result<(), DomainError>;

    /// Find a message by its ID.
    async fn find_message(&self, id: &MessageId) -> Result<Option<Message>, DomainError>;

    /// Messages of a conversation in creation order.
    async fn messages_for(&self, conversation_id: &ConversationId) -> Result<Vec<Message>, DomainError>;

    /// Messages created inside the window, across all conversations.
    async fn list_messages_in(&self, window: &TimeWindow) -> Result<Vec<Message>, DomainError>;
}

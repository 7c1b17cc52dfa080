//! Message entity for support conversations.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ArticleId, Confidence, ConversationId, DomainError, ErrorCode, MessageId, Timestamp,
};
use crate::domain::routing::IntentCategory;

/// Review state of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Written by the customer.
    Customer,
    /// Automated answer awaiting agent review.
    Draft,
    /// Draft modified by an agent, still awaiting approval.
    AgentEdited,
    /// Delivered to the customer.
    Final,
    /// Visible to agents only.
    AgentOnly,
}

impl MessageType {
    pub fn is_pending_review(&self) -> bool {
        matches!(self, Self::Draft | Self::AgentEdited)
    }
}

/// Component that authored an automated message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Router,
    Knowledge,
    Escalation,
}

/// Metadata carried by an automated response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMeta {
    pub reply_to: MessageId,
    pub confidence: Confidence,
    pub intent: IntentCategory,
    pub agent_type: AgentType,
    pub articles: Vec<ArticleId>,
    pub auto_sent: bool,
}

/// A message within a conversation.
///
/// # Invariants
///
/// - `content` is non-empty
/// - only messages pending review can be edited or approved
/// - `original_content` keeps the first automated draft once edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    conversation_id: ConversationId,
    content: String,
    message_type: MessageType,
    confidence: Option<Confidence>,
    intent: Option<IntentCategory>,
    agent_type: Option<AgentType>,
    original_content: Option<String>,
    reply_to: Option<MessageId>,
    article_ids: Vec<ArticleId>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Message {
    fn build(
        conversation_id: ConversationId,
        content: String,
        message_type: MessageType,
    ) -> Result<Self, DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::validation(
                "content",
                "Message content cannot be empty",
            ));
        }
        let now = Timestamp::now();
        Ok(Self {
            id: MessageId::new(),
            conversation_id,
            content,
            message_type,
            confidence: None,
            intent: None,
            agent_type: None,
            original_content: None,
            reply_to: None,
            article_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Creates an inbound customer message.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is empty
    pub fn customer(
        conversation_id: ConversationId,
        content: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Self::build(conversation_id, content.into(), MessageType::Customer)
    }

    /// Creates an automated response; final when auto-sent, draft otherwise.
    pub fn response(
        conversation_id: ConversationId,
        content: impl Into<String>,
        meta: ResponseMeta,
    ) -> Result<Self, DomainError> {
        let message_type = if meta.auto_sent {
            MessageType::Final
        } else {
            MessageType::Draft
        };
        let mut message = Self::build(conversation_id, content.into(), message_type)?;
        message.confidence = Some(meta.confidence);
        message.intent = Some(meta.intent);
        message.agent_type = Some(meta.agent_type);
        message.reply_to = Some(meta.reply_to);
        message.article_ids = meta.articles;
        Ok(message)
    }

    /// Creates an internal note for agents.
    pub fn agent_note(
        conversation_id: ConversationId,
        content: impl Into<String>,
        agent_type: AgentType,
    ) -> Result<Self, DomainError> {
        let mut message = Self::build(conversation_id, content.into(), MessageType::AgentOnly)?;
        message.confidence = Some(Confidence::CERTAIN);
        message.agent_type = Some(agent_type);
        Ok(message)
    }

    /// Backdates the message; used when importing history.
    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = created_at;
        self.updated_at = created_at;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    pub fn confidence(&self) -> Option<Confidence> {
        self.confidence
    }

    pub fn intent(&self) -> Option<IntentCategory> {
        self.intent
    }

    pub fn agent_type(&self) -> Option<AgentType> {
        self.agent_type
    }

    /// The automated text before the first agent edit.
    pub fn original_content(&self) -> Option<&str> {
        self.original_content.as_deref()
    }

    /// Customer message this response answers.
    pub fn reply_to(&self) -> Option<&MessageId> {
        self.reply_to.as_ref()
    }

    pub fn article_ids(&self) -> &[ArticleId] {
        &self.article_ids
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// The automated text as first produced, regardless of later edits.
    pub fn automated_content(&self) -> &str {
        self.original_content.as_deref().unwrap_or(&self.content)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Review workflow
    // ─────────────────────────────────────────────────────────────────────────

    /// Replaces draft content with an agent's edit.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is empty or the message is not pending review
    pub fn edit(&mut self, content: impl Into<String>) -> Result<(), DomainError> {
        self.ensure_pending_review()?;
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::validation(
                "content",
                "Message content cannot be empty",
            ));
        }
        if self.original_content.is_none() {
            self.original_content = Some(std::mem::take(&mut self.content));
        }
        self.content = content;
        self.message_type = MessageType::AgentEdited;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Marks a reviewed draft as delivered.
    pub fn approve(&mut self) -> Result<(), DomainError> {
        self.ensure_pending_review()?;
        self.message_type = MessageType::Final;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    fn ensure_pending_review(&self) -> Result<(), DomainError> {
        if !self.message_type.is_pending_review() {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Message in state {:?} can no longer be changed", self.message_type),
            )
            .with_detail("message_id", self.id.to_string()));
        }
        Ok(())
    }
}

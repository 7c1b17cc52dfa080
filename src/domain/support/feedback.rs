//! Agent feedback on automated responses.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationId, DomainError, ErrorCode, FeedbackId, MessageId, Timestamp};
use crate::domain::routing::IntentCategory;

/// Agent's verdict on an automated response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackRating {
    Helpful,
    NotHelpful,
    NeedsImprovement,
}

/// Feedback left by an agent. Write-once apart from the consumed flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub conversation_id: ConversationId,
    pub message_id: Option<MessageId>,
    pub rating: FeedbackRating,
    /// What the agent would have said instead.
    pub correction: Option<String>,
    pub notes: Option<String>,
    /// Intent the agent says the customer actually had.
    pub corrected_intent: Option<IntentCategory>,
    pub consumed: bool,
    pub created_at: Timestamp,
}

impl Feedback {
    pub fn new(conversation_id: ConversationId, rating: FeedbackRating) -> Self {
        Self {
            id: FeedbackId::new(),
            conversation_id,
            message_id: None,
            rating,
            correction: None,
            notes: None,
            corrected_intent: None,
            consumed: false,
            created_at: Timestamp::now(),
        }
    }

    pub fn with_message(mut self, message_id: MessageId) -> Self {
        self.message_id = Some(message_id);
        self
    }

    /// Sets the correction; blank text counts as no correction.
    pub fn with_correction(mut self, correction: impl Into<String>) -> Self {
        self.correction = non_blank(correction.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = non_blank(notes.into());
        self
    }

    pub fn with_corrected_intent(mut self, intent: IntentCategory) -> Self {
        self.corrected_intent = Some(intent);
        self
    }

    /// True when this feedback can still become a training record.
    pub fn is_convertible(&self) -> bool {
        !self.consumed && self.correction.is_some() && self.message_id.is_some()
    }

    /// Flags the feedback as converted.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if already consumed
    pub fn consume(&mut self) -> Result<(), DomainError> {
        if self.consumed {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Feedback was already converted into a training record",
            )
            .with_detail("feedback_id", self.id.to_string()));
        }
        self.consumed = true;
        Ok(())
    }
}

fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

//! Turns corrective feedback into training records.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::support::{Feedback, TrainingRecord};
use crate::ports::{ConversationRepository, FeedbackRepository};

pub struct FeedbackConverter {
    conversations: Arc<dyn ConversationRepository>,
    feedback: Arc<dyn FeedbackRepository>,
}

impl FeedbackConverter {
    pub fn new(conversations: Arc<dyn ConversationRepository>, feedback: Arc<dyn FeedbackRepository>) -> Self {
        Self {
            conversations,
            feedback,
        }
    }

    /// Derives and stores the training record for `feedback`, consuming it.
    ///
    /// Returns `None` when the feedback is not convertible, the message it
    /// references no longer exists, or another caller consumed it first.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub async fn convert(&self, feedback: &Feedback) -> Result<Option<TrainingRecord>, DomainError> {
        if !feedback.is_convertible() {
            return Ok(None);
        }
        let Some(message_id) = feedback.message_id else {
            return Ok(None);
        };

        let Some(response) = self.conversations.find_message(&message_id).await? else {
            tracing::warn!(
                feedback_id = %feedback.id,
                message_id = %message_id,
                "Feedback references a missing message, skipping conversion"
            );
            return Ok(None);
        };
        let customer_message = match response.reply_to() {
            Some(id) => self.conversations.find_message(id).await?,
            None => None,
        };

        let Some(record) = TrainingRecord::derive(feedback, &response, customer_message.as_ref()) else {
            return Ok(None);
        };
        match self.feedback.convert(&feedback.id, &record).await {
            Ok(()) => {}
            Err(err) if err.code == ErrorCode::InvalidStateTransition => {
                tracing::debug!(feedback_id = %feedback.id, "Feedback already converted");
                return Ok(None);
            }
            Err(err) => return Err(err),
        }
        tracing::debug!(feedback_id = %feedback.id, record_id = %record.id, "Feedback converted");
        Ok(Some(record))
    }
}

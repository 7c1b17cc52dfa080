//! Training records derived from agent corrections.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ArticleId, ConversationId, FeedbackId, MessageId, Timestamp, TrainingRecordId,
};
use crate::domain::routing::IntentCategory;

use super::feedback::Feedback;
use super::message::Message;

/// A correction paired with the automated response it corrects.
///
/// Flips from unprocessed to processed exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub id: TrainingRecordId,
    pub feedback_id: FeedbackId,
    pub conversation_id: ConversationId,
    pub message_id: MessageId,
    /// Text of the customer message the response answered.
    pub customer_message: Option<String>,
    pub original_response: String,
    pub correction: String,
    /// Intent recorded when the response was produced.
    pub intent: Option<IntentCategory>,
    /// Intent asserted by the agent, if any.
    pub corrected_intent: Option<IntentCategory>,
    pub article_ids: Vec<ArticleId>,
    pub processed: bool,
    pub processed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl TrainingRecord {
    /// Builds an unprocessed record; `None` when the feedback carries no
    /// correction.
    pub fn derive(
        feedback: &Feedback,
        response: &Message,
        customer_message: Option<&Message>,
    ) -> Option<Self> {
        let correction = feedback.correction.clone()?;
        Some(Self {
            id: TrainingRecordId::new(),
            feedback_id: feedback.id,
            conversation_id: feedback.conversation_id,
            message_id: *response.id(),
            customer_message: customer_message.map(|m| m.content().to_string()),
            original_response: response.automated_content().to_string(),
            correction,
            intent: response.intent(),
            corrected_intent: feedback.corrected_intent,
            article_ids: response.article_ids().to_vec(),
            processed: false,
            processed_at: None,
            created_at: Timestamp::now(),
        })
    }

    /// Marks the record processed; returns false if it already was.
    pub fn mark_processed(&mut self, at: Timestamp) -> bool {
        if self.processed {
            return false;
        }
        self.processed = true;
        self.processed_at = Some(at);
        true
    }

    /// JSONL line for the training corpus.
    pub fn to_example(&self) -> TrainingExample {
        TrainingExample {
            original: self.original_response.clone(),
            correction: self.correction.clone(),
            intent: self.corrected_intent.or(self.intent).map(|i| i.to_string()),
            conversation_id: self.conversation_id,
        }
    }
}

/// One exported training pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub original: String,
    pub correction: String,
    pub intent: Option<String>,
    pub conversation_id: ConversationId,
}

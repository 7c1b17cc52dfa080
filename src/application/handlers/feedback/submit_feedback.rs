//! SubmitFeedbackHandler - Command handler for agent feedback on a response.
//!
//! Stores the feedback, records the customer's satisfaction score when one
//! is given, and converts corrective feedback straight into a training
//! record plus its evaluation record.

use std::sync::Arc;

use crate::application::services::{FeedbackConverter, ResponseEvaluator};
use crate::domain::foundation::{ConversationId, DomainError, ErrorCode, MessageId};
use crate::domain::routing::IntentCategory;
use crate::domain::support::{
    EvaluationRecord, Feedback, FeedbackRating, SatisfactionScore, TrainingRecord,
};
use crate::ports::{ConversationRepository, EvaluationRepository, FeedbackRepository};

#[derive(Debug, Clone)]
pub struct SubmitFeedbackCommand {
    pub conversation_id: ConversationId,
    /// Response being rated, if any.
    pub message_id: Option<MessageId>,
    pub rating: FeedbackRating,
    pub correction: Option<String>,
    pub notes: Option<String>,
    pub corrected_intent: Option<IntentCategory>,
    /// Customer satisfaction, 1 to 5.
    pub satisfaction: Option<u8>,
}

impl SubmitFeedbackCommand {
    pub fn new(conversation_id: ConversationId, rating: FeedbackRating) -> Self {
        Self {
            conversation_id,
            message_id: None,
            rating,
            correction: None,
            notes: None,
            corrected_intent: None,
            satisfaction: None,
        }
    }

    pub fn on_message(mut self, message_id: MessageId) -> Self {
        self.message_id = Some(message_id);
        self
    }

    pub fn with_correction(mut self, correction: impl Into<String>) -> Self {
        self.correction = Some(correction.into());
        self
    }

    pub fn with_corrected_intent(mut self, intent: IntentCategory) -> Self {
        self.corrected_intent = Some(intent);
        self
    }

    pub fn with_satisfaction(mut self, satisfaction: u8) -> Self {
        self.satisfaction = Some(satisfaction);
        self
    }
}

#[derive(Debug, Clone)]
pub struct SubmitFeedbackResult {
    pub feedback: Feedback,
    pub training_record: Option<TrainingRecord>,
    pub evaluation: Option<EvaluationRecord>,
}

pub struct SubmitFeedbackHandler {
    conversations: Arc<dyn ConversationRepository>,
    feedback: Arc<dyn FeedbackRepository>,
    evaluations: Arc<dyn EvaluationRepository>,
    converter: Arc<FeedbackConverter>,
    evaluator: Arc<ResponseEvaluator>,
}

impl SubmitFeedbackHandler {
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        feedback: Arc<dyn FeedbackRepository>,
        evaluations: Arc<dyn EvaluationRepository>,
        converter: Arc<FeedbackConverter>,
        evaluator: Arc<ResponseEvaluator>,
    ) -> Self {
        Self {
            conversations,
            feedback,
            evaluations,
            converter,
            evaluator,
        }
    }

    pub async fn handle(&self, cmd: SubmitFeedbackCommand) -> Result<SubmitFeedbackResult, DomainError> {
        let satisfaction = cmd.satisfaction.map(SatisfactionScore::new).transpose()?;

        // 1. Validate references
        let mut conversation = self
            .conversations
            .find_by_id(&cmd.conversation_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::ConversationNotFound, "Conversation not found")
                    .with_detail("conversation_id", cmd.conversation_id.to_string())
            })?;

        if let Some(message_id) = cmd.message_id {
            let belongs = self
                .conversations
                .find_message(&message_id)
                .await?
                .map_or(false, |m| *m.conversation_id() == cmd.conversation_id);
            if !belongs {
                return Err(DomainError::new(ErrorCode::MessageNotFound, "Message not found in conversation")
                    .with_detail("message_id", message_id.to_string()));
            }
        }

        // 2. Store the feedback
        let mut feedback = Feedback::new(cmd.conversation_id, cmd.rating);
        if let Some(message_id) = cmd.message_id {
            feedback = feedback.with_message(message_id);
        }
        if let Some(correction) = cmd.correction {
            feedback = feedback.with_correction(correction);
        }
        if let Some(notes) = cmd.notes {
            feedback = feedback.with_notes(notes);
        }
        if let Some(intent) = cmd.corrected_intent {
            feedback = feedback.with_corrected_intent(intent);
        }
        self.feedback.save_feedback(&feedback).await?;

        if let Some(score) = satisfaction {
            conversation.rate(score);
            self.conversations.update(&conversation).await?;
        }

        // 3. Convert corrective feedback
        let training_record = self.converter.convert(&feedback).await?;
        let evaluation = match &training_record {
            Some(record) => {
                feedback.consumed = true;
                let evaluation = self
                    .evaluator
                    .evaluate(record, conversation.satisfaction().map(|s| s.value()))
                    .await;
                self.evaluations.save(&evaluation).await?;
                Some(evaluation)
            }
            None => None,
        };

        tracing::info!(
            feedback_id = %feedback.id,
            conversation_id = %feedback.conversation_id,
            rating = ?feedback.rating,
            converted = training_record.is_some(),
            "Feedback recorded"
        );

        Ok(SubmitFeedbackResult {
            feedback,
            training_record,
            evaluation,
        })
    }
}

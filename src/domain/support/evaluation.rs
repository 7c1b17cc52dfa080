//! Per-message quality measurements.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ConversationId, EvaluationRecordId, MessageId, Timestamp, TrainingRecordId,
};

/// Quality scores of one automated response, computed once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub id: EvaluationRecordId,
    pub message_id: MessageId,
    pub conversation_id: ConversationId,
    pub training_record_id: Option<TrainingRecordId>,
    /// N-gram overlap between the automated response and the correction.
    pub overlap_score: f64,
    /// Embedding cosine; absent when embeddings were unavailable.
    pub semantic_similarity: Option<f64>,
    pub satisfaction: Option<u8>,
    pub created_at: Timestamp,
}

impl EvaluationRecord {
    pub fn new(
        message_id: MessageId,
        conversation_id: ConversationId,
        overlap_score: f64,
        semantic_similarity: Option<f64>,
    ) -> Self {
        Self {
            id: EvaluationRecordId::new(),
            message_id,
            conversation_id,
            training_record_id: None,
            overlap_score,
            semantic_similarity,
            satisfaction: None,
            created_at: Timestamp::now(),
        }
    }

    pub fn for_training_record(mut self, id: TrainingRecordId) -> Self {
        self.training_record_id = Some(id);
        self
    }

    pub fn with_satisfaction(mut self, satisfaction: Option<u8>) -> Self {
        self.satisfaction = satisfaction;
        self
    }
}

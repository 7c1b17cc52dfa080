//! Scores an automated response against the agent's correction.

use std::sync::Arc;

use super::SimilarityEngine;
use crate::domain::evaluation::bleu;
use crate::domain::support::{EvaluationRecord, TrainingRecord};

pub struct ResponseEvaluator {
    engine: Arc<SimilarityEngine>,
}

impl ResponseEvaluator {
    pub fn new(engine: Arc<SimilarityEngine>) -> Self {
        Self { engine }
    }

    /// BLEU against the correction plus embedding cosine when embeddings
    /// are available.
    pub async fn evaluate(&self, record: &TrainingRecord, satisfaction: Option<u8>) -> EvaluationRecord {
        let overlap = bleu(&record.correction, &record.original_response);
        let semantic = self
            .semantic_similarity(&record.correction, &record.original_response)
            .await;

        EvaluationRecord::new(record.message_id, record.conversation_id, overlap, semantic)
            .for_training_record(record.id)
            .with_satisfaction(satisfaction)
    }

    async fn semantic_similarity(&self, reference: &str, candidate: &str) -> Option<f64> {
        let embedded = async {
            let reference = self.engine.embed(reference).await?;
            let candidate = self.engine.embed(candidate).await?;
            Ok::<_, crate::ports::EmbeddingError>(self.engine.similarity(&reference, &candidate))
        };
        match embedded.await {
            Ok(similarity) => Some(similarity),
            Err(err) => {
                tracing::warn!(error = %err, "Embedding unavailable, skipping semantic similarity");
                None
            }
        }
    }
}

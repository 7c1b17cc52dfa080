//! CompareVariantsHandler - Query handler for an experiment's standings.

use std::sync::Arc;

use super::load_experiment;
use crate::domain::evaluation::{VariantComparison, VariantMetrics};
use crate::domain::foundation::{DomainError, ExperimentId, VariantId};
use crate::ports::{ConversationRepository, ExperimentRepository};

#[derive(Debug, Clone)]
pub struct CompareVariantsQuery {
    pub experiment_id: ExperimentId,
}

pub struct CompareVariantsHandler {
    conversations: Arc<dyn ConversationRepository>,
    experiments: Arc<dyn ExperimentRepository>,
}

impl CompareVariantsHandler {
    pub fn new(conversations: Arc<dyn ConversationRepository>, experiments: Arc<dyn ExperimentRepository>) -> Self {
        Self {
            conversations,
            experiments,
        }
    }

    /// Computed on demand from the conversations assigned to each variant;
    /// works for running and concluded experiments alike.
    pub async fn handle(&self, query: CompareVariantsQuery) -> Result<VariantComparison, DomainError> {
        let experiment = load_experiment(self.experiments.as_ref(), &query.experiment_id).await?;

        let variant_a = self.metrics(&query.experiment_id, experiment.variant_a()).await?;
        let variant_b = self.metrics(&query.experiment_id, experiment.variant_b()).await?;
        let comparison = VariantComparison::new(variant_a, variant_b);

        tracing::debug!(
            experiment_id = %query.experiment_id,
            leader = ?comparison.leader,
            "Variants compared"
        );
        Ok(comparison)
    }

    async fn metrics(&self, experiment_id: &ExperimentId, variant_id: &VariantId) -> Result<VariantMetrics, DomainError> {
        let conversations = self.conversations.list_by_variant(experiment_id, variant_id).await?;

        let mut confidences = Vec::new();
        for conversation in &conversations {
            let messages = self.conversations.messages_for(conversation.id()).await?;
            confidences.extend(
                messages
                    .iter()
                    .filter(|m| m.reply_to().is_some())
                    .filter_map(|m| m.confidence())
                    .map(|c| c.value()),
            );
        }

        Ok(VariantMetrics::compute(*variant_id, &conversations, &confidences))
    }
}

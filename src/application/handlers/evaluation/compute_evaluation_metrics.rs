//! ComputeEvaluationMetricsHandler - Query handler for response-quality metrics.
//!
//! Training records without an evaluation are scored first, so the summary
//! always covers every correction created in the window.

use std::sync::Arc;

use crate::application::services::ResponseEvaluator;
use crate::domain::evaluation::EvaluationSummary;
use crate::domain::foundation::{DomainError, TimeWindow};
use crate::ports::{ConversationRepository, EvaluationRepository, FeedbackRepository};

#[derive(Debug, Clone)]
pub struct ComputeEvaluationMetricsQuery {
    pub window: TimeWindow,
}

pub struct ComputeEvaluationMetricsHandler {
    conversations: Arc<dyn ConversationRepository>,
    feedback: Arc<dyn FeedbackRepository>,
    evaluations: Arc<dyn EvaluationRepository>,
    evaluator: Arc<ResponseEvaluator>,
}

impl ComputeEvaluationMetricsHandler {
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        feedback: Arc<dyn FeedbackRepository>,
        evaluations: Arc<dyn EvaluationRepository>,
        evaluator: Arc<ResponseEvaluator>,
    ) -> Self {
        Self {
            conversations,
            feedback,
            evaluations,
            evaluator,
        }
    }

    pub async fn handle(&self, query: ComputeEvaluationMetricsQuery) -> Result<EvaluationSummary, DomainError> {
        let window = query.window;

        // 1. Fill in missing evaluation records
        let mut computed = 0usize;
        for record in self.feedback.list_created_in(&window).await? {
            if self.evaluations.find_by_message(&record.message_id).await?.is_some() {
                continue;
            }
            let satisfaction = self
                .conversations
                .find_by_id(&record.conversation_id)
                .await?
                .and_then(|c| c.satisfaction())
                .map(|s| s.value());
            let evaluation = self.evaluator.evaluate(&record, satisfaction).await;
            self.evaluations.save(&evaluation).await?;
            computed += 1;
        }

        // 2. Aggregate
        let records = self.evaluations.list_created_in(&window).await?;
        let conversations = self.conversations.list_created_in(&window).await?;
        let summary = EvaluationSummary::compute(window, &records, &conversations);

        tracing::info!(
            evaluations_computed = computed,
            evaluation_samples = summary.evaluation_samples,
            conversation_samples = summary.conversation_samples,
            "Evaluation metrics computed"
        );
        Ok(summary)
    }
}

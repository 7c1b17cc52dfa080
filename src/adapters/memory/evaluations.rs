//! In-memory evaluation records.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, MessageId, TimeWindow};
use crate::domain::support::EvaluationRecord;
use crate::ports::EvaluationRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryEvaluationRepository {
    records: Arc<RwLock<Vec<EvaluationRecord>>>,
}

impl InMemoryEvaluationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EvaluationRepository for InMemoryEvaluationRepository {
    async fn save(&self, record: &EvaluationRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.message_id == record.message_id) {
            tracing::debug!(message_id = %record.message_id, "Evaluation already recorded");
            return Ok(());
        }
        records.push(record.clone());
        Ok(())
    }

    async fn find_by_message(&self, message_id: &MessageId) -> Result<Option<EvaluationRecord>, DomainError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.message_id == *message_id)
            .cloned())
    }

    async fn list_created_in(&self, window: &TimeWindow) -> Result<Vec<EvaluationRecord>, DomainError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| window.contains(&r.created_at))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ConversationId;

    #[tokio::test]
    async fn second_record_for_a_message_is_ignored() {
        let repo = InMemoryEvaluationRepository::new();
        let message_id = MessageId::new();
        let first = EvaluationRecord::new(message_id, ConversationId::new(), 0.4, None);
        let second = EvaluationRecord::new(message_id, ConversationId::new(), 0.9, Some(0.8));

        repo.save(&first).await.unwrap();
        repo.save(&second).await.unwrap();

        let stored = repo.find_by_message(&message_id).await.unwrap().unwrap();
        assert_eq!(stored.overlap_score, 0.4);
        assert_eq!(repo.list_created_in(&TimeWindow::unbounded()).await.unwrap().len(), 1);
    }
}

//! In-memory feedback and training record storage.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, FeedbackId, TimeWindow};
use crate::domain::support::{Feedback, TrainingRecord};
use crate::ports::FeedbackRepository;

#[derive(Debug, Default)]
struct Store {
    feedback: Vec<Feedback>,
    records: Vec<TrainingRecord>,
}

/// Feedback and training records share one lock so conversion is atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFeedbackRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryFeedbackRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn training_record_count(&self) -> usize {
        self.store.read().await.records.len()
    }
}

fn feedback_not_found(id: &FeedbackId) -> DomainError {
    DomainError::new(ErrorCode::StorageError, "Feedback not found")
        .with_detail("feedback_id", id.to_string())
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn save_feedback(&self, feedback: &Feedback) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        if store.feedback.iter().any(|f| f.id == feedback.id) {
            return Err(DomainError::new(ErrorCode::StorageError, "Feedback is write-once")
                .with_detail("feedback_id", feedback.id.to_string()));
        }
        store.feedback.push(feedback.clone());
        Ok(())
    }

    async fn find_feedback(&self, id: &FeedbackId) -> Result<Option<Feedback>, DomainError> {
        Ok(self.store.read().await.feedback.iter().find(|f| f.id == *id).cloned())
    }

    async fn list_feedback_in(&self, window: &TimeWindow) -> Result<Vec<Feedback>, DomainError> {
        Ok(self
            .store
            .read()
            .await
            .feedback
            .iter()
            .filter(|f| window.contains(&f.created_at))
            .cloned()
            .collect())
    }

    async fn list_unconsumed_with_correction(&self) -> Result<Vec<Feedback>, DomainError> {
        Ok(self
            .store
            .read()
            .await
            .feedback
            .iter()
            .filter(|f| !f.consumed && f.correction.is_some())
            .cloned()
            .collect())
    }

    async fn convert(&self, feedback_id: &FeedbackId, record: &TrainingRecord) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        let feedback = store
            .feedback
            .iter_mut()
            .find(|f| f.id == *feedback_id)
            .ok_or_else(|| feedback_not_found(feedback_id))?;
        feedback.consume()?;
        store.records.push(record.clone());
        Ok(())
    }

    async fn update_training_record(&self, record: &TrainingRecord) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        match store.records.iter_mut().find(|r| r.id == record.id) {
            Some(stored) => {
                *stored = record.clone();
                Ok(())
            }
            None => Err(DomainError::new(ErrorCode::StorageError, "Training record not found")
                .with_detail("training_record_id", record.id.to_string())),
        }
    }

    async fn list_unprocessed(&self) -> Result<Vec<TrainingRecord>, DomainError> {
        Ok(self
            .store
            .read()
            .await
            .records
            .iter()
            .filter(|r| !r.processed)
            .cloned()
            .collect())
    }

    async fn list_processed_in(&self, window: &TimeWindow) -> Result<Vec<TrainingRecord>, DomainError> {
        Ok(self
            .store
            .read()
            .await
            .records
            .iter()
            .filter(|r| r.processed_at.map_or(false, |at| window.contains(&at)))
            .cloned()
            .collect())
    }

    async fn list_created_in(&self, window: &TimeWindow) -> Result<Vec<TrainingRecord>, DomainError> {
        Ok(self
            .store
            .read()
            .await
            .records
            .iter()
            .filter(|r| window.contains(&r.created_at))
            .cloned()
            .collect())
    }
}

//! Feedback and training record repository port.
//!
//! Feedback and the training records derived from it live behind one port
//! so that consuming feedback and saving its record can be atomic.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, FeedbackId, TimeWindow};
use crate::domain::support::{Feedback, TrainingRecord};

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn save_feedback(&self, feedback: &Feedback) -> Result<(), DomainError>;

    async fn find_feedback(&self, id: &FeedbackId) -> Result<Option<Feedback>, DomainError>;

    /// Feedback created inside the window, consumed or not.
    async fn list_feedback_in(&self, window: &TimeWindow) -> Result<Vec<Feedback>, DomainError>;

    /// Feedback not yet converted that carries a correction.
    async fn list_unconsumed_with_correction(&self) -> Result<Vec<Feedback>, DomainError>;

    /// Stores a derived record and marks its feedback consumed in one step.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the feedback was already consumed
    async fn convert(&self, feedback_id: &FeedbackId, record: &TrainingRecord) -> Result<(), DomainError>;

    /// Replace a stored training record.
    async fn update_training_record(&self, record: &TrainingRecord) -> Result<(), DomainError>;

    async fn list_unprocessed(&self) -> Result<Vec<TrainingRecord>, DomainError>;

    /// Processed records whose processed timestamp lies in the window.
    async fn list_processed_in(&self, window: &TimeWindow) -> Result<Vec<TrainingRecord>, DomainError>;

    /// Records created in the window, processed or not.
    async fn list_created_in(&self, window: &TimeWindow) -> Result<Vec<TrainingRecord>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn FeedbackRepository) {}
    }
}

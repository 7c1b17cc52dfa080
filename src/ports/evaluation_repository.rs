//! Evaluation record repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MessageId, TimeWindow};
use crate::domain::support::EvaluationRecord;

#[async_trait]
pub trait EvaluationRepository: Send + Sync {
    /// Store a record. Records are immutable; saving a second record for the
    /// same message is ignored.
    async fn save(&self, record: &EvaluationRecord) -> Result<(), DomainError>;

    async fn find_by_message(&self, message_id: &MessageId) -> Result<Option<EvaluationRecord>, DomainError>;

    async fn list_created_in(&self, window: &TimeWindow) -> Result<Vec<EvaluationRecord>, DomainError>;
}

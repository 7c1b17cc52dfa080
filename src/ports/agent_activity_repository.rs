//! Agent action and correction log port.

use async_trait::async_trait;

use crate::domain::foundation::{ConversationId, DomainError, TimeWindow};
use crate::domain::support::{AgentAction, Correction};

#[async_trait]
pub trait AgentActivityRepository: Send + Sync {
    async fn record_action(&self, action: &AgentAction) -> Result<(), DomainError>;

    async fn record_correction(&self, correction: &Correction) -> Result<(), DomainError>;

    async fn actions_in(&self, window: &TimeWindow) -> Result<Vec<AgentAction>, DomainError>;

    async fn corrections_in(&self, window: &TimeWindow) -> Result<Vec<Correction>, DomainError>;

    async fn actions_for(&self, conversation_id: &ConversationId) -> Result<Vec<AgentAction>, DomainError>;

    async fn corrections_for(&self, conversation_id: &ConversationId) -> Result<Vec<Correction>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_activity_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn AgentActivityRepository) {}
    }
}

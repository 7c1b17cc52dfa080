//! In-memory agent action and correction log.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{ConversationId, DomainError, TimeWindow};
use crate::domain::support::{AgentAction, Correction};
use crate::ports::AgentActivityRepository;

/// Append-only activity log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgentActivityRepository {
    actions: Arc<RwLock<Vec<AgentAction>>>,
    corrections: Arc<RwLock<Vec<Correction>>>,
}

impl InMemoryAgentActivityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentActivityRepository for InMemoryAgentActivityRepository {
    async fn record_action(&self, action: &AgentAction) -> Result<(), DomainError> {
        self.actions.write().await.push(action.clone());
        Ok(())
    }

    async fn record_correction(&self, correction: &Correction) -> Result<(), DomainError> {
        self.corrections.write().await.push(correction.clone());
        Ok(())
    }

    async fn actions_in(&self, window: &TimeWindow) -> Result<Vec<AgentAction>, DomainError> {
        Ok(self
            .actions
            .read()
            .await
            .iter()
            .filter(|a| window.contains(&a.created_at))
            .cloned()
            .collect())
    }

    async fn corrections_in(&self, window: &TimeWindow) -> Result<Vec<Correction>, DomainError> {
        Ok(self
            .corrections
            .read()
            .await
            .iter()
            .filter(|c| window.contains(&c.created_at))
            .cloned()
            .collect())
    }

    async fn actions_for(&self, conversation_id: &ConversationId) -> Result<Vec<AgentAction>, DomainError> {
        Ok(self
            .actions
            .read()
            .await
            .iter()
            .filter(|a| a.conversation_id == *conversation_id)
            .cloned()
            .collect())
    }

    async fn corrections_for(&self, conversation_id: &ConversationId) -> Result<Vec<Correction>, DomainError> {
        Ok(self
            .corrections
            .read()
            .await
            .iter()
            .filter(|c| c.conversation_id == *conversation_id)
            .cloned()
            .collect())
    }
}

//! AssignVariantHandler - Command handler for routing a conversation into an experiment.

use std::sync::Arc;

use super::load_experiment;
use crate::domain::evaluation::assign;
use crate::domain::foundation::{ConversationId, DomainError, ErrorCode, ExperimentId};
use crate::domain::support::VariantAssignment;
use crate::ports::{ConversationRepository, ExperimentRepository};

#[derive(Debug, Clone)]
pub struct AssignVariantCommand {
    pub experiment_id: ExperimentId,
    pub conversation_id: ConversationId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignVariantResult {
    pub assignment: VariantAssignment,
    /// True only when this call stored the assignment on the conversation.
    pub newly_assigned: bool,
}

pub struct AssignVariantHandler {
    conversations: Arc<dyn ConversationRepository>,
    experiments: Arc<dyn ExperimentRepository>,
}

impl AssignVariantHandler {
    pub fn new(conversations: Arc<dyn ConversationRepository>, experiments: Arc<dyn ExperimentRepository>) -> Self {
        Self {
            conversations,
            experiments,
        }
    }

    /// Records the deterministic variant for the conversation, or returns the
    /// assignment it already has in this experiment.
    ///
    /// A conversation already enrolled in another experiment keeps that
    /// assignment; the variant it would get here is returned unrecorded.
    ///
    /// # Errors
    ///
    /// - `ExperimentNotFound` / `ConversationNotFound`
    /// - `ExperimentNotRunning` unless the experiment is running
    /// - `ConversationArchived` for a resolved conversation without assignment
    pub async fn handle(&self, cmd: AssignVariantCommand) -> Result<AssignVariantResult, DomainError> {
        let experiment = load_experiment(self.experiments.as_ref(), &cmd.experiment_id).await?;
        experiment.ensure_running()?;

        let mut conversation = self
            .conversations
            .find_by_id(&cmd.conversation_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::ConversationNotFound, "Conversation not found")
                    .with_detail("conversation_id", cmd.conversation_id.to_string())
            })?;

        let computed = VariantAssignment {
            experiment_id: cmd.experiment_id,
            variant_id: assign(&experiment, &cmd.conversation_id),
        };
        match conversation.assignment() {
            Some(existing) if existing.experiment_id == cmd.experiment_id => {
                return Ok(AssignVariantResult {
                    assignment: *existing,
                    newly_assigned: false,
                });
            }
            Some(existing) => {
                tracing::debug!(
                    conversation_id = %cmd.conversation_id,
                    enrolled_in = %existing.experiment_id,
                    experiment_id = %cmd.experiment_id,
                    "Conversation enrolled elsewhere, assignment not recorded"
                );
                return Ok(AssignVariantResult {
                    assignment: computed,
                    newly_assigned: false,
                });
            }
            None => {}
        }

        let assignment = conversation.assign_variant(computed)?;
        self.conversations.update(&conversation).await?;

        tracing::debug!(
            conversation_id = %cmd.conversation_id,
            experiment_id = %cmd.experiment_id,
            variant_id = %assignment.variant_id,
            "Variant assigned"
        );
        Ok(AssignVariantResult {
            assignment,
            newly_assigned: true,
        })
    }
}

//! Conversation aggregate and its lifecycle.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ConversationId, CustomerId, DomainError, ErrorCode, ExperimentId, StateMachine, Timestamp,
    ValidationError, VariantId,
};

/// Lifecycle status of a support conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    /// Customer and automation are exchanging messages.
    #[default]
    Active,

    /// Handed to a human agent.
    Escalated,

    /// Closed; the conversation is archived and immutable.
    Resolved,
}

impl StateMachine for ConversationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConversationStatus::*;
        matches!(
            (self, target),
            (Active, Escalated) | (Active, Resolved) | (Escalated, Resolved)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConversationStatus::*;
        match self {
            Active => vec![Escalated, Resolved],
            Escalated => vec![Resolved],
            Resolved => vec![],
        }
    }
}

/// Customer satisfaction score on a 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SatisfactionScore(u8);

impl SatisfactionScore {
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if !(1..=Self::MAX).contains(&value) {
            return Err(ValidationError::out_of_range(
                "satisfaction",
                1.0,
                Self::MAX as f64,
                value as f64,
            ));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Experiment variant a conversation was routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantAssignment {
    pub experiment_id: ExperimentId,
    pub variant_id: VariantId,
}

/// A customer support conversation.
///
/// # Invariants
///
/// - status only changes through [`ConversationStatus`] transitions
/// - a resolved conversation rejects every mutation
/// - the variant assignment is written at most once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    customer_id: CustomerId,
    status: ConversationStatus,
    satisfaction: Option<SatisfactionScore>,
    assignment: Option<VariantAssignment>,
    created_at: Timestamp,
    updated_at: Timestamp,
    resolved_at: Option<Timestamp>,
}

impl Conversation {
    /// Starts an active conversation for a customer.
    pub fn start(customer_id: CustomerId) -> Self {
        let now = Timestamp::now();
        Self {
            id: ConversationId::new(),
            customer_id,
            status: ConversationStatus::Active,
            satisfaction: None,
            assignment: None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
        }
    }

    /// Overrides the creation time; used when importing history.
    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = created_at;
        self.updated_at = created_at;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    pub fn status(&self) -> ConversationStatus {
        self.status
    }

    pub fn satisfaction(&self) -> Option<SatisfactionScore> {
        self.satisfaction
    }

    pub fn assignment(&self) -> Option<&VariantAssignment> {
        self.assignment.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn resolved_at(&self) -> Option<&Timestamp> {
        self.resolved_at.as_ref()
    }

    pub fn is_archived(&self) -> bool {
        self.status == ConversationStatus::Resolved
    }

    pub fn is_escalated(&self) -> bool {
        self.status == ConversationStatus::Escalated
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Hands the conversation to a human agent.
    ///
    /// Escalating an already escalated conversation is a no-op.
    pub fn escalate(&mut self) -> Result<(), DomainError> {
        if self.status == ConversationStatus::Escalated {
            return Ok(());
        }
        self.status = self.status.transition_to(ConversationStatus::Escalated)?;
        self.touch();
        Ok(())
    }

    /// Closes the conversation.
    pub fn resolve(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(ConversationStatus::Resolved)?;
        let now = Timestamp::now();
        self.resolved_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Records the customer's satisfaction score.
    ///
    /// Allowed after resolution, since surveys arrive once a conversation closes.
    pub fn rate(&mut self, score: SatisfactionScore) {
        self.satisfaction = Some(score);
        self.updated_at = Timestamp::now();
    }

    /// Records the variant assignment the first time; later calls return the
    /// existing assignment unchanged.
    pub fn assign_variant(
        &mut self,
        assignment: VariantAssignment,
    ) -> Result<VariantAssignment, DomainError> {
        if let Some(existing) = self.assignment {
            return Ok(existing);
        }
        self.ensure_mutable()?;
        self.assignment = Some(assignment);
        self.touch();
        Ok(assignment)
    }

    /// Fails when the conversation is archived.
    pub fn ensure_mutable(&self) -> Result<(), DomainError> {
        if self.is_archived() {
            return Err(DomainError::new(
                ErrorCode::ConversationArchived,
                "Conversation is resolved and can no longer change",
            )
            .with_detail("conversation_id", self.id.to_string()));
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation() -> Conversation {
        Conversation::start(CustomerId::new("session-1").unwrap())
    }

    fn assignment() -> VariantAssignment {
        VariantAssignment {
            experiment_id: ExperimentId::new(),
            variant_id: VariantId::new(),
        }
    }

    #[test]
    fn new_conversation_is_active() {
        let c = conversation();
        assert_eq!(c.status(), ConversationStatus::Active);
        assert!(c.resolved_at().is_none());
    }

    #[test]
    fn escalated_conversation_can_resolve() {
        let mut c = conversation();
        c.escalate().unwrap();
        c.escalate().unwrap();
        assert!(c.is_escalated());
        c.resolve().unwrap();
        assert!(c.is_archived());
        assert!(c.resolved_at().is_some());
    }

    #[test]
    fn resolved_is_terminal() {
        let mut c = conversation();
        c.resolve().unwrap();
        let err = c.escalate().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert!(ConversationStatus::Resolved.is_terminal());
    }

    #[test]
    fn variant_assignment_is_written_once() {
        let mut c = conversation();
        let first = assignment();
        assert_eq!(c.assign_variant(first).unwrap(), first);
        assert_eq!(c.assign_variant(assignment()).unwrap(), first);
    }

    #[test]
    fn archived_conversation_rejects_assignment() {
        let mut c = conversation();
        c.resolve().unwrap();
        let err = c.assign_variant(assignment()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConversationArchived);
    }

    #[test]
    fn satisfaction_must_be_one_to_five() {
        assert!(SatisfactionScore::new(0).is_err());
        assert!(SatisfactionScore::new(6).is_err());
        let mut c = conversation();
        c.rate(SatisfactionScore::new(4).unwrap());
        assert_eq!(c.satisfaction().map(|s| s.value()), Some(4));
    }
}

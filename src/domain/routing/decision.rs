//! Routing decision for one inbound message.

use serde::{Deserialize, Serialize};

use super::escalation::EscalationReason;
use super::retrieval::RetrievalResult;
use super::thresholds::DecisionThresholds;
use crate::domain::foundation::Confidence;

/// What produced the text of a knowledge answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    Generator,
    Rules,
}

/// The handling path chosen for a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Decision {
    Escalation {
        reason: EscalationReason,
    },
    KnowledgeAnswer {
        retrieval: RetrievalResult,
        source: ResponseSource,
    },
}

/// Where a message ended up once the response was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionState {
    Escalated,
    AnsweredAutoSent,
    AnsweredPendingReview,
}

impl Decision {
    /// Confidence attached to the emitted response.
    pub fn confidence(&self) -> Confidence {
        match self {
            Decision::Escalation { .. } => Confidence::CERTAIN,
            Decision::KnowledgeAnswer { retrieval, .. } => retrieval.confidence,
        }
    }

    /// Escalations always go out; answers need to clear the auto-send bar.
    pub fn should_auto_send(&self, thresholds: &DecisionThresholds) -> bool {
        match self {
            Decision::Escalation { .. } => true,
            Decision::KnowledgeAnswer { retrieval, .. } => {
                thresholds.should_auto_send(retrieval.confidence)
            }
        }
    }

    pub fn state(&self, thresholds: &DecisionThresholds) -> DecisionState {
        match self {
            Decision::Escalation { .. } => DecisionState::Escalated,
            Decision::KnowledgeAnswer { .. } if self.should_auto_send(thresholds) => {
                DecisionState::AnsweredAutoSent
            }
            Decision::KnowledgeAnswer { .. } => DecisionState::AnsweredPendingReview,
        }
    }

    pub fn is_escalation(&self) -> bool {
        matches!(self, Decision::Escalation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(confidence: f64) -> Decision {
        Decision::KnowledgeAnswer {
            retrieval: RetrievalResult {
                matches: vec![],
                confidence: Confidence::new(confidence),
                strategy: None,
                context: String::new(),
            },
            source: ResponseSource::Rules,
        }
    }

    #[test]
    fn escalation_is_certain_and_auto_sent() {
        let decision = Decision::Escalation {
            reason: EscalationReason::Complaint,
        };
        let thresholds = DecisionThresholds::default();
        assert_eq!(decision.confidence(), Confidence::CERTAIN);
        assert!(decision.should_auto_send(&thresholds));
        assert_eq!(decision.state(&thresholds), DecisionState::Escalated);
    }

    #[test]
    fn answer_state_follows_threshold() {
        let thresholds = DecisionThresholds::default();
        assert_eq!(answer(0.65).state(&thresholds), DecisionState::AnsweredAutoSent);
        assert_eq!(answer(0.4).state(&thresholds), DecisionState::AnsweredPendingReview);
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(Decision::Escalation {
            reason: EscalationReason::ExplicitRequest,
        })
        .unwrap();
        assert_eq!(json["type"], "escalation");
        assert_eq!(json["reason"]["kind"], "explicit_request");
    }
}

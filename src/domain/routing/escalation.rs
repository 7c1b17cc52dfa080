//! Escalation rules and handoff text.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::intent::{IntentCategory, IntentClassification};
use super::thresholds::DecisionThresholds;

/// Customer-facing text sent when a conversation is handed to a human.
pub const HANDOFF_MESSAGE: &str = "I understand you need assistance. I'm connecting you with a human agent who can help you better. Please hold while we transfer your conversation.";

/// Phrases that count as an explicit request for a person.
pub fn default_handoff_keywords() -> Vec<String> {
    vec!["human".into(), "agent".into(), "speak to someone".into()]
}

/// Why a conversation was escalated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EscalationReason {
    LowConfidence { confidence: f64 },
    TechnicalSupportLowConfidence { confidence: f64 },
    Complaint,
    ExplicitRequest,
}

impl fmt::Display for EscalationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscalationReason::LowConfidence { confidence } => {
                write!(f, "Low confidence in intent classification ({:.2})", confidence)
            }
            EscalationReason::TechnicalSupportLowConfidence { confidence } => {
                write!(f, "Technical support query with low confidence ({:.2})", confidence)
            }
            EscalationReason::Complaint => write!(f, "Customer complaint requires human attention"),
            EscalationReason::ExplicitRequest => write!(f, "Explicit request for human agent"),
        }
    }
}

impl EscalationReason {
    /// Message shown to the customer.
    pub fn customer_message(&self) -> String {
        format!("{} (Reason: {})", HANDOFF_MESSAGE, self)
    }

    /// Internal note left for the receiving agent.
    pub fn agent_note(&self) -> String {
        format!("Conversation escalated to human agent. Reason: {}", self)
    }
}

/// Decides whether a classified message must go to a human.
#[derive(Debug, Clone, PartialEq)]
pub struct EscalationPolicy {
    handoff_keywords: Vec<String>,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self::new(default_handoff_keywords())
    }
}

impl EscalationPolicy {
    pub fn new(handoff_keywords: Vec<String>) -> Self {
        Self {
            handoff_keywords: handoff_keywords
                .into_iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn handoff_keywords(&self) -> &[String] {
        &self.handoff_keywords
    }

    /// True if `text` contains any handoff keyword, case-insensitively.
    pub fn requests_human(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.handoff_keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    /// Returns the escalation reason, or `None` when the message may be
    /// answered automatically.
    pub fn evaluate(
        &self,
        classification: &IntentClassification,
        text: &str,
        thresholds: &DecisionThresholds,
    ) -> Option<EscalationReason> {
        let confidence = classification.confidence.value();

        if confidence < thresholds.escalation_floor {
            return Some(EscalationReason::LowConfidence { confidence });
        }
        if classification.intent == IntentCategory::TechnicalSupport
            && confidence < thresholds.technical_support_floor
        {
            return Some(EscalationReason::TechnicalSupportLowConfidence { confidence });
        }
        if classification.intent == IntentCategory::Complaint {
            return Some(EscalationReason::Complaint);
        }
        if self.requests_human(text) {
            return Some(EscalationReason::ExplicitRequest);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::routing::intent::ClassificationMethod;
    use std::collections::BTreeMap;

    fn classified(intent: IntentCategory, confidence: f64) -> IntentClassification {
        IntentClassification::from_scores(
            BTreeMap::from([(intent, confidence)]),
            ClassificationMethod::Embedding,
        )
    }

    #[test]
    fn low_confidence_escalates_with_formatted_reason() {
        let policy = EscalationPolicy::default();
        let reason = policy
            .evaluate(&classified(IntentCategory::Faq, 0.234), "hmm", &DecisionThresholds::default())
            .unwrap();
        assert_eq!(reason.to_string(), "Low confidence in intent classification (0.23)");
    }

    #[test]
    fn complaint_always_escalates() {
        let policy = EscalationPolicy::default();
        let reason = policy.evaluate(
            &classified(IntentCategory::Complaint, 0.95),
            "This is bad",
            &DecisionThresholds::default(),
        );
        assert_eq!(reason, Some(EscalationReason::Complaint));
    }

    #[test]
    fn handoff_keyword_is_case_insensitive() {
        let policy = EscalationPolicy::default();
        let reason = policy.evaluate(
            &classified(IntentCategory::General, 0.9),
            "Let me SPEAK TO SOMEONE please",
            &DecisionThresholds::default(),
        );
        assert_eq!(reason, Some(EscalationReason::ExplicitRequest));
    }

    #[test]
    fn technical_support_uses_stricter_floor() {
        let policy = EscalationPolicy::default();
        let thresholds = DecisionThresholds::default();
        assert_eq!(
            policy.evaluate(&classified(IntentCategory::TechnicalSupport, 0.5), "app crash", &thresholds),
            Some(EscalationReason::TechnicalSupportLowConfidence { confidence: 0.5 })
        );
        assert_eq!(
            policy.evaluate(&classified(IntentCategory::TechnicalSupport, 0.6), "app crash", &thresholds),
            None
        );
        assert_eq!(
            policy.evaluate(&classified(IntentCategory::Faq, 0.5), "refund", &thresholds),
            None
        );
    }

    #[test]
    fn customer_message_carries_reason_suffix() {
        let text = EscalationReason::ExplicitRequest.customer_message();
        assert!(text.starts_with(HANDOFF_MESSAGE));
        assert!(text.ends_with(" (Reason: Explicit request for human agent)"));
    }

    #[test]
    fn custom_keywords_replace_defaults() {
        let policy = EscalationPolicy::new(vec!["Representative".into(), "  ".into()]);
        assert_eq!(policy.handoff_keywords(), &["representative".to_string()]);
        assert!(policy.requests_human("Get me a representative"));
        assert!(!policy.requests_human("I want a human"));
    }
}

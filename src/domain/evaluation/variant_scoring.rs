//! Per-variant metrics and the weighted comparison score.

use serde::{Deserialize, Serialize};

use super::aggregates::{deflection_rate, mean};
use crate::domain::foundation::VariantId;
use crate::domain::support::{Conversation, SatisfactionScore};

const SATISFACTION_WEIGHT: f64 = 0.4;
const DEFLECTION_WEIGHT: f64 = 0.4;
const CONFIDENCE_WEIGHT: f64 = 0.2;

/// Observed metrics for one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantMetrics {
    pub variant_id: VariantId,
    pub conversations: usize,
    pub mean_satisfaction: Option<f64>,
    pub deflection_rate: Option<f64>,
    pub mean_confidence: Option<f64>,
    pub score: f64,
}

impl VariantMetrics {
    /// Computes metrics from the variant's conversations and the confidences
    /// of their automated responses.
    pub fn compute(variant_id: VariantId, conversations: &[Conversation], confidences: &[f64]) -> Self {
        let mean_satisfaction = mean(
            conversations
                .iter()
                .filter_map(|c| c.satisfaction().map(|s| s.value() as f64)),
        );
        let deflection = deflection_rate(conversations);
        let mean_confidence = mean(confidences.iter().copied());

        Self {
            variant_id,
            conversations: conversations.len(),
            mean_satisfaction,
            deflection_rate: deflection,
            mean_confidence,
            score: weighted_score(mean_satisfaction, deflection, mean_confidence),
        }
    }
}

/// `0.4 * satisfaction/5 + 0.4 * deflection + 0.2 * confidence`; a missing
/// metric contributes zero.
pub fn weighted_score(
    mean_satisfaction: Option<f64>,
    deflection: Option<f64>,
    mean_confidence: Option<f64>,
) -> f64 {
    let satisfaction = mean_satisfaction.unwrap_or(0.0) / SatisfactionScore::MAX as f64;
    SATISFACTION_WEIGHT * satisfaction
        + DEFLECTION_WEIGHT * deflection.unwrap_or(0.0)
        + CONFIDENCE_WEIGHT * mean_confidence.unwrap_or(0.0)
}

/// Which variant is ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "variant_id", rename_all = "snake_case")]
pub enum Leader {
    Variant(VariantId),
    Tie,
    /// At least one variant has no conversations yet.
    Undetermined,
}

/// Side-by-side comparison of an experiment's variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantComparison {
    pub variant_a: VariantMetrics,
    pub variant_b: VariantMetrics,
    pub leader: Leader,
}

impl VariantComparison {
    pub fn new(variant_a: VariantMetrics, variant_b: VariantMetrics) -> Self {
        let leader = if variant_a.conversations == 0 || variant_b.conversations == 0 {
            Leader::Undetermined
        } else if variant_a.score > variant_b.score {
            Leader::Variant(variant_a.variant_id)
        } else if variant_b.score > variant_a.score {
            Leader::Variant(variant_b.variant_id)
        } else {
            Leader::Tie
        };
        Self {
            variant_a,
            variant_b,
            leader,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::CustomerId;

    fn conversations(count: usize, escalated: usize, satisfaction: u8) -> Vec<Conversation> {
        (0..count)
            .map(|i| {
                let mut c = Conversation::start(CustomerId::new("c").unwrap());
                if i < escalated {
                    c.escalate().unwrap();
                }
                c.rate(SatisfactionScore::new(satisfaction).unwrap());
                c
            })
            .collect()
    }

    #[test]
    fn weighted_score_normalizes_satisfaction() {
        let score = weighted_score(Some(5.0), Some(1.0), Some(1.0));
        assert!((score - 1.0).abs() < 1e-9);
        assert_eq!(weighted_score(None, None, None), 0.0);
    }

    #[test]
    fn higher_score_leads() {
        let a = VariantMetrics::compute(VariantId::new(), &conversations(4, 0, 5), &[0.85]);
        let b = VariantMetrics::compute(VariantId::new(), &conversations(4, 2, 3), &[0.65]);
        let a_id = a.variant_id;
        let comparison = VariantComparison::new(a, b);
        assert_eq!(comparison.leader, Leader::Variant(a_id));
    }

    #[test]
    fn equal_scores_tie() {
        let a = VariantMetrics::compute(VariantId::new(), &conversations(2, 1, 4), &[0.5]);
        let b = VariantMetrics::compute(VariantId::new(), &conversations(2, 1, 4), &[0.5]);
        assert_eq!(VariantComparison::new(a, b).leader, Leader::Tie);
    }

    #[test]
    fn empty_variant_is_undetermined() {
        let a = VariantMetrics::compute(VariantId::new(), &conversations(3, 0, 5), &[0.9]);
        let b = VariantMetrics::compute(VariantId::new(), &[], &[]);
        assert_eq!(b.mean_satisfaction, None);
        assert_eq!(VariantComparison::new(a, b).leader, Leader::Undetermined);
    }
}

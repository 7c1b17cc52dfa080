//! Intent categories and classification results.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Confidence, ValidationError};

/// Closed set of customer intents.
///
/// Declaration order matters: it breaks ties between categories that score
/// the same similarity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    General,
    Faq,
    OrderInquiry,
    TechnicalSupport,
    Complaint,
}

impl IntentCategory {
    /// All categories in declaration order.
    pub const ALL: [IntentCategory; 5] = [
        IntentCategory::General,
        IntentCategory::Faq,
        IntentCategory::OrderInquiry,
        IntentCategory::TechnicalSupport,
        IntentCategory::Complaint,
    ];

    /// Returns the snake_case label used in storage and exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentCategory::General => "general",
            IntentCategory::Faq => "faq",
            IntentCategory::OrderInquiry => "order_inquiry",
            IntentCategory::TechnicalSupport => "technical_support",
            IntentCategory::Complaint => "complaint",
        }
    }
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IntentCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntentCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| ValidationError::invalid_format("intent", format!("unknown intent '{}'", s)))
    }
}

/// How a classification was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    /// Max cosine similarity against example embeddings.
    Embedding,
    /// Keyword fallback used when embeddings are unavailable.
    Keyword,
}

/// Result of classifying one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentClassification {
    pub intent: IntentCategory,
    /// Winning score clamped into `[0, 1]`.
    pub confidence: Confidence,
    /// Raw per-category scores, unclamped.
    pub scores: BTreeMap<IntentCategory, f64>,
    pub method: ClassificationMethod,
}

impl IntentClassification {
    /// Picks the highest-scoring category, earliest declared wins ties.
    ///
    /// Categories absent from `scores` are treated as scoring negative
    /// infinity; an empty map yields `General` with zero confidence.
    pub fn from_scores(scores: BTreeMap<IntentCategory, f64>, method: ClassificationMethod) -> Self {
        let mut best: Option<(IntentCategory, f64)> = None;
        for category in IntentCategory::ALL {
            if let Some(&score) = scores.get(&category) {
                match best {
                    Some((_, top)) if score <= top => {}
                    _ => best = Some((category, score)),
                }
            }
        }

        let (intent, raw) = best.unwrap_or((IntentCategory::General, 0.0));
        Self {
            intent,
            confidence: Confidence::new(raw),
            scores,
            method,
        }
    }
}

/// Default example phrases per category.
pub static DEFAULT_EXAMPLES: Lazy<BTreeMap<IntentCategory, Vec<String>>> = Lazy::new(|| {
    let table: [(IntentCategory, [&str; 5]); 5] = [
        (
            IntentCategory::Faq,
            [
                "What is your return policy?",
                "How do I track my order?",
                "What are your shipping options?",
                "How do I reset my password?",
                "What is your refund policy?",
            ],
        ),
        (
            IntentCategory::OrderInquiry,
            [
                "Where is my order?",
                "When will my order arrive?",
                "I need to cancel my order",
                "Can I modify my order?",
                "What's the status of order #12345?",
            ],
        ),
        (
            IntentCategory::TechnicalSupport,
            [
                "The website is not working",
                "I can't log into my account",
                "The app keeps crashing",
                "I'm having trouble with checkout",
                "The payment failed",
            ],
        ),
        (
            IntentCategory::Complaint,
            [
                "I'm not happy with my purchase",
                "The product arrived damaged",
                "The service was terrible",
                "I want to file a complaint",
                "This is unacceptable",
            ],
        ),
        (
            IntentCategory::General,
            [
                "Hello",
                "Hi there",
                "Help me",
                "I need assistance",
                "What can you do?",
            ],
        ),
    ];

    table
        .into_iter()
        .map(|(category, phrases)| (category, phrases.iter().map(|p| p.to_string()).collect()))
        .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_str() {
        for category in IntentCategory::ALL {
            assert_eq!(category.as_str().parse::<IntentCategory>().unwrap(), category);
        }
        assert!("billing".parse::<IntentCategory>().is_err());
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&IntentCategory::TechnicalSupport).unwrap();
        assert_eq!(json, "\"technical_support\"");
    }

    #[test]
    fn from_scores_picks_maximum() {
        let scores = BTreeMap::from([
            (IntentCategory::General, 0.2),
            (IntentCategory::Faq, 0.8),
            (IntentCategory::Complaint, 0.5),
        ]);
        let result = IntentClassification::from_scores(scores, ClassificationMethod::Embedding);
        assert_eq!(result.intent, IntentCategory::Faq);
        assert_eq!(result.confidence.value(), 0.8);
    }

    #[test]
    fn from_scores_breaks_ties_by_declaration_order() {
        let scores = BTreeMap::from([
            (IntentCategory::Complaint, 0.7),
            (IntentCategory::OrderInquiry, 0.7),
        ]);
        let result = IntentClassification::from_scores(scores, ClassificationMethod::Embedding);
        assert_eq!(result.intent, IntentCategory::OrderInquiry);
    }

    #[test]
    fn from_scores_clamps_confidence_but_keeps_raw_scores() {
        let scores = BTreeMap::from([(IntentCategory::General, -0.4)]);
        let result = IntentClassification::from_scores(scores, ClassificationMethod::Embedding);
        assert_eq!(result.confidence.value(), 0.0);
        assert_eq!(result.scores[&IntentCategory::General], -0.4);
    }

    #[test]
    fn default_examples_cover_every_category() {
        for category in IntentCategory::ALL {
            assert_eq!(DEFAULT_EXAMPLES[&category].len(), 5);
        }
    }
}

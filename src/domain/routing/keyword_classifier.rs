//! Keyword intent matcher used when embeddings are unavailable.

use std::collections::BTreeMap;

use super::intent::{ClassificationMethod, IntentCategory, IntentClassification};
use crate::domain::foundation::Confidence;

/// Confidence reported when no keyword matches.
pub const NO_MATCH_CONFIDENCE: f64 = 0.5;

const ORDER_INQUIRY: &[&str] = &["order", "track", "shipment", "delivery", "cancel order"];
const TECHNICAL_SUPPORT: &[&str] = &["not working", "error", "bug", "crash", "login", "password"];
const COMPLAINT: &[&str] = &["complaint", "unhappy", "terrible", "bad", "damaged", "wrong"];
const FAQ: &[&str] = &["policy", "return", "refund", "shipping", "how", "what", "when"];

fn keywords_for(category: IntentCategory) -> &'static [&'static str] {
    match category {
        IntentCategory::OrderInquiry => ORDER_INQUIRY,
        IntentCategory::TechnicalSupport => TECHNICAL_SUPPORT,
        IntentCategory::Complaint => COMPLAINT,
        IntentCategory::Faq => FAQ,
        IntentCategory::General => &[],
    }
}

/// Classifies by case-insensitive substring matches.
///
/// Each category scores `matched / keywords`. When nothing matches the
/// result is `General` at 0.5.
pub fn classify_by_keywords(text: &str) -> IntentClassification {
    let lowered = text.to_lowercase();
    let mut scores = BTreeMap::new();

    for category in IntentCategory::ALL {
        let keywords = keywords_for(category);
        if keywords.is_empty() {
            continue;
        }
        let matched = keywords.iter().filter(|kw| lowered.contains(*kw)).count();
        if matched > 0 {
            scores.insert(category, matched as f64 / keywords.len() as f64);
        }
    }

    if scores.is_empty() {
        return IntentClassification {
            intent: IntentCategory::General,
            confidence: Confidence::new(NO_MATCH_CONFIDENCE),
            scores: BTreeMap::from([(IntentCategory::General, NO_MATCH_CONFIDENCE)]),
            method: ClassificationMethod::Keyword,
        };
    }

    IntentClassification::from_scores(scores, ClassificationMethod::Keyword)
}

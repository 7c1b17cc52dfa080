//! Routing domain - intent, retrieval calibration and the escalate/answer decision.
//!
//! Everything here is pure: the application services feed it embeddings,
//! articles and classifications and it returns decisions.

mod decision;
mod escalation;
mod intent;
mod keyword_classifier;
mod lexical;
mod prompt;
mod retrieval;
mod rule_responder;
mod similarity;
mod thresholds;

pub use decision::{Decision, DecisionState, ResponseSource};
pub use escalation::{default_handoff_keywords, EscalationPolicy, EscalationReason, HANDOFF_MESSAGE};
pub use intent::{ClassificationMethod, IntentCategory, IntentClassification, DEFAULT_EXAMPLES};
pub use keyword_classifier::{classify_by_keywords, NO_MATCH_CONFIDENCE};
pub use lexical::{coverage, lexical_search, overlap, tokenize};
pub use prompt::{PromptTemplate, DEFAULT_TEMPLATE, SYSTEM_PROMPT};
pub use retrieval::{build_context, truncate_chars, ArticleMatch, RetrievalResult, RetrievalStrategy};
pub use rule_responder::{compose_rule_response, ARTICLE_QUOTE_CUTOFF};
pub use similarity::cosine_similarity;
pub use thresholds::{ConfidenceBands, DecisionThresholds};

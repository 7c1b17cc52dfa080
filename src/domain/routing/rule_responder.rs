//! Templated responses used when text generation is unavailable.

use super::retrieval::{truncate_chars, ArticleMatch};

/// Best match score above which the article is quoted directly.
pub const ARTICLE_QUOTE_CUTOFF: f64 = 0.3;

const KEYWORD_REPLIES: &[(&[&str], &str)] = &[
    (
        &["return", "refund", "exchange"],
        "I'd be happy to help with your return. Our return policy allows returns within 30 days of purchase. Could you provide your order number so I can check the specifics?",
    ),
    (
        &["shipping", "delivery", "tracking"],
        "I can help you with shipping information. Could you please provide your order number? Standard shipping typically takes 3-5 business days.",
    ),
    (
        &["account", "login", "password", "reset"],
        "For account issues, I can help you reset your password or update your account information. What specific issue are you experiencing?",
    ),
    (
        &["product", "item", "specs", "details", "price"],
        "I'd be happy to provide product information. Which product are you interested in learning more about?",
    ),
    (
        &["cancel", "order"],
        "I can help you with your order. If you'd like to cancel or modify an order, please provide your order number and I'll check if it's possible.",
    ),
    (
        &["hi", "hello", "hey"],
        "Hello! I'm here to help you with any questions about your order, returns, shipping, or our products. How can I assist you today?",
    ),
];

const GENERIC_REPLY: &str = "I'm here to help! I can assist with questions about orders, returns, shipping, account issues, and product information. Could you provide more details about what you need help with?";

/// Composes a reply from the best match or from keyword templates.
///
/// Keyword checks are substring matches on the lowercased message, tried in
/// a fixed order.
pub fn compose_rule_response(message: &str, matches: &[ArticleMatch], snippet_chars: usize) -> String {
    if let Some(best) = matches.first().filter(|m| m.score > ARTICLE_QUOTE_CUTOFF) {
        return format!(
            "Based on our {} policy:\n\n{}...\n\nWould you like more specific information about this?",
            best.category,
            truncate_chars(&best.body, snippet_chars)
        );
    }

    let lowered = message.to_lowercase();
    KEYWORD_REPLIES
        .iter()
        .find(|(words, _)| words.iter().any(|w| lowered.contains(w)))
        .map(|(_, reply)| reply.to_string())
        .unwrap_or_else(|| GENERIC_REPLY.to_string())
}

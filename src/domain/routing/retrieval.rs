//! Retrieval results and answer context.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ArticleId, Confidence};
use crate::domain::support::KnowledgeArticle;

/// Which search strategy produced the matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalStrategy {
    Vector,
    Lexical,
}

/// One article matched for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleMatch {
    pub article_id: ArticleId,
    pub title: String,
    pub category: String,
    pub snippet: String,
    #[serde(skip)]
    pub body: String,
    /// Raw strategy score; cosine for vector search, overlap for lexical.
    pub score: f64,
}

impl ArticleMatch {
    pub fn from_article(article: &KnowledgeArticle, score: f64, snippet_chars: usize) -> Self {
        Self {
            article_id: *article.id(),
            title: article.title().to_string(),
            category: article.category().to_string(),
            snippet: truncate_chars(article.body(), snippet_chars),
            body: article.body().to_string(),
            score,
        }
    }
}

/// Output of a knowledge lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub matches: Vec<ArticleMatch>,
    pub confidence: Confidence,
    /// `None` when no strategy found anything.
    pub strategy: Option<RetrievalStrategy>,
    pub context: String,
}

impl RetrievalResult {
    pub fn best_score(&self) -> Option<f64> {
        self.matches.first().map(|m| m.score)
    }

    pub fn article_ids(&self) -> Vec<ArticleId> {
        self.matches.iter().map(|m| m.article_id).collect()
    }
}

/// Builds the prompt context from the leading matches.
///
/// Empty when nothing matched.
pub fn build_context(matches: &[ArticleMatch], articles: usize, body_chars: usize) -> String {
    if matches.is_empty() {
        return String::new();
    }

    let mut context = String::from("Relevant information:\n\n");
    for m in matches.iter().take(articles) {
        context.push_str(&format!(
            "**{}**\n{}...\n\n",
            m.title,
            truncate_chars(&m.body, body_chars)
        ));
    }
    context
}

/// First `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

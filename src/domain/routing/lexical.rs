//! Token overlap scoring.
//!
//! Text is lowercased and split on every non-alphanumeric character, so
//! "What's" yields the tokens `what` and `s`.

use std::collections::BTreeSet;

use super::retrieval::ArticleMatch;
use crate::domain::support::KnowledgeArticle;

/// Lowercase alphanumeric token set of `text`.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Share of `query` tokens that also appear in `document`.
///
/// Returns 0 for an empty query.
pub fn overlap(query: &BTreeSet<String>, document: &BTreeSet<String>) -> f64 {
    if query.is_empty() {
        return 0.0;
    }
    let common = query.intersection(document).count();
    common as f64 / query.len() as f64
}

/// Share of tokens in `text` found in `reference`.
pub fn coverage(text: &str, reference: &str) -> f64 {
    overlap(&tokenize(text), &tokenize(reference))
}

/// Ranks `articles` by overlap with `query`, dropping those with no common token.
///
/// Ties keep the input order.
pub fn lexical_search<'a, I>(
    query: &str,
    articles: I,
    top_k: usize,
    snippet_chars: usize,
) -> Vec<ArticleMatch>
where
    I: IntoIterator<Item = &'a KnowledgeArticle>,
{
    let query_tokens = tokenize(query);
    let mut scored: Vec<ArticleMatch> = articles
        .into_iter()
        .filter_map(|article| {
            let score = overlap(&query_tokens, &tokenize(&article.searchable_text()));
            (score > 0.0).then(|| ArticleMatch::from_article(article, score, snippet_chars))
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_k);
    scored
}

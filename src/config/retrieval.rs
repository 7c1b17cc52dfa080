//! Knowledge retrieval configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::handlers::feedback::DEFAULT_ARTICLE_OVERLAP_FLOOR;
use crate::application::services::RetrievalSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Matches included in the prompt context
    #[serde(default = "default_context_articles")]
    pub context_articles: usize,

    #[serde(default = "default_context_chars")]
    pub context_chars: usize,

    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,

    /// Corrections covering less of an article than this mark it for re-embedding
    #[serde(default = "default_article_overlap_floor")]
    pub article_overlap_floor: f64,
}

impl RetrievalConfig {
    pub fn settings(&self) -> RetrievalSettings {
        RetrievalSettings {
            top_k: self.top_k,
            context_articles: self.context_articles,
            context_chars: self.context_chars,
            snippet_chars: self.snippet_chars,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.top_k == 0 {
            return Err(ValidationError::InvalidRetrieval("retrieval.top_k"));
        }
        if self.context_chars == 0 || self.snippet_chars == 0 {
            return Err(ValidationError::InvalidRetrieval("retrieval.context_chars"));
        }
        if !(0.0..=1.0).contains(&self.article_overlap_floor) {
            return Err(ValidationError::InvalidRetrieval(
                "retrieval.article_overlap_floor",
            ));
        }
        Ok(())
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            context_articles: default_context_articles(),
            context_chars: default_context_chars(),
            snippet_chars: default_snippet_chars(),
            article_overlap_floor: default_article_overlap_floor(),
        }
    }
}

fn default_top_k() -> usize {
    RetrievalSettings::default().top_k
}

fn default_context_articles() -> usize {
    RetrievalSettings::default().context_articles
}

fn default_context_chars() -> usize {
    RetrievalSettings::default().context_chars
}

fn default_snippet_chars() -> usize {
    RetrievalSettings::default().snippet_chars
}

fn default_article_overlap_floor() -> f64 {
    DEFAULT_ARTICLE_OVERLAP_FLOOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_retriever_defaults() {
        let config = RetrievalConfig::default();
        assert_eq!(config.settings(), RetrievalSettings::default());
        assert_eq!(config.article_overlap_floor, 0.5);
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let config = RetrievalConfig {
            top_k: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overlap_floor_range() {
        let config = RetrievalConfig {
            article_overlap_floor: 1.2,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidRetrieval("retrieval.article_overlap_floor"))
        ));
    }
}

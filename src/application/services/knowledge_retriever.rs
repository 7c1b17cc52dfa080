//! Knowledge retriever - vector search first, lexical overlap as fallback.
//!
//! Vector search only covers embedded articles; articles still waiting for
//! an embedding are scored lexically and merged into the same ranking.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::SimilarityEngine;
use crate::domain::foundation::{ArticleId, DomainError};
use crate::domain::routing::{
    build_context, lexical_search, ArticleMatch, ConfidenceBands, RetrievalResult,
    RetrievalStrategy,
};
use crate::domain::support::KnowledgeArticle;
use crate::ports::{KnowledgeRepository, VectorIndex};

/// Sizes used when retrieving and building context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
    /// Matches included in the prompt context.
    pub context_articles: usize,
    /// Body characters per context entry.
    pub context_chars: usize,
    pub snippet_chars: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 3,
            context_articles: 2,
            context_chars: 300,
            snippet_chars: 200,
        }
    }
}

pub struct KnowledgeRetriever {
    articles: Arc<dyn KnowledgeRepository>,
    index: Arc<dyn VectorIndex>,
    engine: Arc<SimilarityEngine>,
    settings: RetrievalSettings,
}

impl KnowledgeRetriever {
    pub fn new(
        articles: Arc<dyn KnowledgeRepository>,
        index: Arc<dyn VectorIndex>,
        engine: Arc<SimilarityEngine>,
        settings: RetrievalSettings,
    ) -> Self {
        Self {
            articles,
            index,
            engine,
            settings,
        }
    }

    pub fn settings(&self) -> &RetrievalSettings {
        &self.settings
    }

    /// Retrieves up to `top_k` matches and calibrates their confidence.
    ///
    /// # Errors
    ///
    /// Only storage failures; an unavailable embedding backend or vector
    /// index hands over to lexical search.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        bands: &ConfidenceBands,
    ) -> Result<RetrievalResult, DomainError> {
        let articles = self.articles.list_all().await?;

        let (matches, strategy) = match self.vector_search(query, top_k, &articles).await {
            Some(matches) if !matches.is_empty() => (matches, Some(RetrievalStrategy::Vector)),
            _ => {
                let matches = lexical_search(query, &articles, top_k, self.settings.snippet_chars);
                let strategy = (!matches.is_empty()).then_some(RetrievalStrategy::Lexical);
                (matches, strategy)
            }
        };

        let confidence = bands.calibrate(matches.first().map(|m| m.score));
        let context = build_context(
            &matches,
            self.settings.context_articles,
            self.settings.context_chars,
        );
        tracing::debug!(
            strategy = ?strategy,
            matches = matches.len(),
            confidence = %confidence,
            "Retrieved knowledge"
        );

        Ok(RetrievalResult {
            matches,
            confidence,
            strategy,
            context,
        })
    }

    /// `None` when the embedding backend or the index is unavailable.
    async fn vector_search(
        &self,
        query: &str,
        top_k: usize,
        articles: &[KnowledgeArticle],
    ) -> Option<Vec<ArticleMatch>> {
        if !articles.iter().any(|a| a.is_embedded()) {
            return None;
        }

        let vector = match self.engine.embed(query).await {
            Ok(vector) => vector,
            Err(err) => {
                tracing::warn!(error = %err, "Embedding unavailable, using lexical retrieval");
                return None;
            }
        };
        let neighbors = match self.index.search(&vector, top_k).await {
            Ok(neighbors) => neighbors,
            Err(err) => {
                tracing::warn!(error = %err, "Vector index unavailable, using lexical retrieval");
                return None;
            }
        };

        let by_id: HashMap<&ArticleId, &KnowledgeArticle> =
            articles.iter().map(|a| (a.id(), a)).collect();
        let mut matches: Vec<ArticleMatch> = neighbors
            .into_iter()
            .filter(|n| n.score > 0.0)
            .filter_map(|n| {
                by_id
                    .get(&n.article_id)
                    .filter(|a| a.is_embedded())
                    .map(|a| ArticleMatch::from_article(a, n.score, self.settings.snippet_chars))
            })
            .collect();

        let pending = articles.iter().filter(|a| !a.is_embedded());
        matches.extend(lexical_search(query, pending, top_k, self.settings.snippet_chars));

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(top_k);
        Some(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{HashingEmbedder, ScriptedEmbedder};
    use crate::adapters::memory::{InMemoryKnowledgeRepository, InMemoryVectorIndex};
    use crate::application::services::IntentExampleCache;
    use crate::ports::EmbeddingProvider;
    use std::time::Duration;

    struct Fixture {
        articles: Arc<InMemoryKnowledgeRepository>,
        index: Arc<InMemoryVectorIndex>,
        retriever: KnowledgeRetriever,
    }

    fn fixture(embedder: Arc<dyn EmbeddingProvider>) -> Fixture {
        let articles = Arc::new(InMemoryKnowledgeRepository::new());
        let index = Arc::new(InMemoryVectorIndex::new());
        let engine = Arc::new(SimilarityEngine::new(
            embedder,
            Arc::new(IntentExampleCache::default()),
            Duration::from_secs(1),
        ));
        let retriever = KnowledgeRetriever::new(
            articles.clone(),
            index.clone(),
            engine,
            RetrievalSettings::default(),
        );
        Fixture {
            articles,
            index,
            retriever,
        }
    }

    fn return_policy() -> KnowledgeArticle {
        KnowledgeArticle::new(
            "Return Policy",
            "Items can be returned within 30 days of purchase for a full refund.",
            "returns",
            vec!["return".into(), "refund".into()],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn lexical_fallback_maps_overlap_to_band() {
        let f = fixture(Arc::new(ScriptedEmbedder::unavailable()));
        f.articles.save(&return_policy()).await.unwrap();

        let result = f
            .retriever
            .retrieve("What's your return policy?", 3, &ConfidenceBands::default())
            .await
            .unwrap();

        // "what", "s", "your", "return", "policy": return and policy match.
        assert_eq!(result.strategy, Some(RetrievalStrategy::Lexical));
        assert!((result.matches[0].score - 0.4).abs() < 1e-9);
        assert_eq!(result.confidence.value(), 0.4);
        assert!(result.context.starts_with("Relevant information:\n\n**Return Policy**\n"));
    }

    #[tokio::test]
    async fn no_match_yields_floor_and_empty_context() {
        let f = fixture(Arc::new(ScriptedEmbedder::unavailable()));
        f.articles.save(&return_policy()).await.unwrap();

        let result = f
            .retriever
            .retrieve("zzz qqq", 3, &ConfidenceBands::default())
            .await
            .unwrap();

        assert!(result.matches.is_empty());
        assert_eq!(result.strategy, None);
        assert_eq!(result.confidence.value(), 0.3);
        assert_eq!(result.context, "");
    }

    #[tokio::test]
    async fn vector_search_merges_unembedded_articles() {
        let embedder = HashingEmbedder::default();
        let f = fixture(Arc::new(embedder.clone()));

        let mut embedded = return_policy();
        let vector = embedder.embed_text(&embedded.searchable_text());
        let fingerprint = embedded.fingerprint();
        embedded.attach_embedding(vector.clone(), fingerprint).unwrap();
        f.articles.save(&embedded).await.unwrap();
        f.index.upsert(*embedded.id(), vector).await.unwrap();

        let pending = KnowledgeArticle::new(
            "Shipping Times",
            "Standard shipping takes 3-5 business days.",
            "shipping",
            vec![],
        )
        .unwrap();
        f.articles.save(&pending).await.unwrap();

        let result = f
            .retriever
            .retrieve("return refund shipping", 3, &ConfidenceBands::default())
            .await
            .unwrap();

        assert_eq!(result.strategy, Some(RetrievalStrategy::Vector));
        let ids = result.article_ids();
        assert!(ids.contains(embedded.id()));
        assert!(ids.contains(pending.id()));
    }

    #[tokio::test]
    async fn leftover_vector_of_edited_article_is_ignored() {
        let embedder = HashingEmbedder::default();
        let f = fixture(Arc::new(embedder.clone()));

        let mut article = return_policy();
        let vector = embedder.embed_text(&article.searchable_text());
        f.index.upsert(*article.id(), vector).await.unwrap();
        article
            .edit("Return Policy", "Returns are accepted within 60 days.", vec!["return".into()])
            .unwrap();
        f.articles.save(&article).await.unwrap();

        let result = f
            .retriever
            .retrieve("return policy refund", 3, &ConfidenceBands::default())
            .await
            .unwrap();

        let hits = result
            .matches
            .iter()
            .filter(|m| m.article_id == *article.id())
            .count();
        assert_eq!(hits, 1);
    }
}

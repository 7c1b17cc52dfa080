//! Keeps article embeddings and the vector index consistent with article text.

use std::sync::Arc;

use super::SimilarityEngine;
use crate::domain::foundation::{ArticleId, DomainError, ErrorCode};
use crate::domain::support::KnowledgeArticle;
use crate::ports::{KnowledgeRepository, VectorIndex};

/// Outcome of (re-)embedding one article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedOutcome {
    /// Embedded from the current text and indexed.
    Embedded,
    /// Already embedded from the current text.
    Unchanged,
    /// Backend or index unavailable; the article stays searchable lexically.
    Deferred,
}

pub struct KnowledgeIndex {
    articles: Arc<dyn KnowledgeRepository>,
    index: Arc<dyn VectorIndex>,
    engine: Arc<SimilarityEngine>,
}

impl KnowledgeIndex {
    pub fn new(
        articles: Arc<dyn KnowledgeRepository>,
        index: Arc<dyn VectorIndex>,
        engine: Arc<SimilarityEngine>,
    ) -> Self {
        Self {
            articles,
            index,
            engine,
        }
    }

    /// Stores an article and embeds it when it is not embedded yet.
    ///
    /// # Errors
    ///
    /// Storage failures only.
    pub async fn index_article(&self, article: KnowledgeArticle) -> Result<(KnowledgeArticle, EmbedOutcome), DomainError> {
        self.articles.save(&article).await?;
        if article.is_embedded() {
            return Ok((article, EmbedOutcome::Unchanged));
        }
        self.embed_and_store(article).await
    }

    /// Re-embeds an article from its current text, even if already embedded.
    ///
    /// # Errors
    ///
    /// - `ArticleNotFound` if the article doesn't exist
    pub async fn reembed(&self, id: &ArticleId) -> Result<EmbedOutcome, DomainError> {
        let article = self.articles.find_by_id(id).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::ArticleNotFound, "Article not found")
                .with_detail("article_id", id.to_string())
        })?;
        let (_, outcome) = self.embed_and_store(article).await?;
        Ok(outcome)
    }

    /// Deletes an article and its vector.
    ///
    /// # Errors
    ///
    /// - `ArticleNotFound` if the article doesn't exist
    pub async fn remove_article(&self, id: &ArticleId) -> Result<(), DomainError> {
        self.articles.delete(id).await?;
        if let Err(err) = self.index.remove(id).await {
            tracing::warn!(article_id = %id, error = %err, "Failed to drop article vector");
        }
        Ok(())
    }

    async fn embed_and_store(
        &self,
        article: KnowledgeArticle,
    ) -> Result<(KnowledgeArticle, EmbedOutcome), DomainError> {
        let fingerprint = article.fingerprint();
        let vector = match self.engine.embed(&article.searchable_text()).await {
            Ok(vector) => vector,
            Err(err) => {
                tracing::warn!(article_id = %article.id(), error = %err, "Embedding deferred");
                self.drop_stale_vector(&article).await;
                return Ok((article, EmbedOutcome::Deferred));
            }
        };

        // The article may have been edited or removed while embedding.
        let mut current = match self.articles.find_by_id(article.id()).await? {
            Some(current) if current.fingerprint() == fingerprint => current,
            Some(current) => {
                tracing::debug!(article_id = %article.id(), "Article edited during embedding, discarding vector");
                return Ok((current, EmbedOutcome::Deferred));
            }
            None => {
                tracing::debug!(article_id = %article.id(), "Article removed during embedding, discarding vector");
                return Ok((article, EmbedOutcome::Deferred));
            }
        };

        if let Err(err) = self.index.upsert(*current.id(), vector.clone()).await {
            tracing::warn!(article_id = %current.id(), error = %err, "Vector index rejected article");
            self.drop_stale_vector(&current).await;
            return Ok((current, EmbedOutcome::Deferred));
        }

        current.attach_embedding(vector, fingerprint)?;
        self.articles.save(&current).await?;
        tracing::debug!(article_id = %current.id(), "Article embedded");
        Ok((current, EmbedOutcome::Embedded))
    }

    /// An article without a current embedding must not linger in the index.
    async fn drop_stale_vector(&self, article: &KnowledgeArticle) {
        if let Err(err) = self.index.remove(article.id()).await {
            tracing::warn!(article_id = %article.id(), error = %err, "Failed to drop stale vector");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{HashingEmbedder, ScriptedEmbedder};
    use crate::adapters::memory::{InMemoryKnowledgeRepository, InMemoryVectorIndex};
    use crate::application::services::IntentExampleCache;
    use std::time::Duration;

    struct Fixture {
        embedder: HashingEmbedder,
        articles: Arc<InMemoryKnowledgeRepository>,
        index: Arc<InMemoryVectorIndex>,
        knowledge: KnowledgeIndex,
    }

    fn fixture() -> Fixture {
        let embedder = HashingEmbedder::default();
        let articles = Arc::new(InMemoryKnowledgeRepository::new());
        let index = Arc::new(InMemoryVectorIndex::new());
        let engine = Arc::new(SimilarityEngine::new(
            Arc::new(embedder.clone()),
            Arc::new(IntentExampleCache::default()),
            Duration::from_secs(1),
        ));
        let knowledge = KnowledgeIndex::new(articles.clone(), index.clone(), engine);
        Fixture {
            embedder,
            articles,
            index,
            knowledge,
        }
    }

    fn article() -> KnowledgeArticle {
        KnowledgeArticle::new("Password reset", "Use the forgot password link.", "account", vec![]).unwrap()
    }

    #[tokio::test]
    async fn indexing_embeds_and_stores() {
        let f = fixture();
        let (stored, outcome) = f.knowledge.index_article(article()).await.unwrap();

        assert_eq!(outcome, EmbedOutcome::Embedded);
        assert!(f.articles.find_by_id(stored.id()).await.unwrap().unwrap().is_embedded());
        assert_eq!(f.index.indexed_ids().await.unwrap(), vec![*stored.id()]);
    }

    #[tokio::test]
    async fn outage_defers_embedding_and_clears_stale_vector() {
        let f = fixture();
        let (mut stored, _) = f.knowledge.index_article(article()).await.unwrap();

        f.embedder.set_offline(true);
        stored.edit("Password reset", "Contact support to reset.", vec![]).unwrap();
        let (stored, outcome) = f.knowledge.index_article(stored).await.unwrap();

        assert_eq!(outcome, EmbedOutcome::Deferred);
        assert!(!stored.is_embedded());
        assert!(f.index.is_empty().await);

        f.embedder.set_offline(false);
        assert_eq!(f.knowledge.reembed(stored.id()).await.unwrap(), EmbedOutcome::Embedded);
        assert_eq!(f.index.len().await, 1);
    }

    #[tokio::test]
    async fn edit_during_slow_reembed_wins() {
        let articles = Arc::new(InMemoryKnowledgeRepository::new());
        let index = Arc::new(InMemoryVectorIndex::new());
        let embedder = ScriptedEmbedder::new()
            .with_default_vector(vec![1.0, 0.0])
            .with_delay(Duration::from_millis(200));
        let engine = Arc::new(SimilarityEngine::new(
            Arc::new(embedder),
            Arc::new(IntentExampleCache::default()),
            Duration::from_secs(2),
        ));
        let knowledge = Arc::new(KnowledgeIndex::new(articles.clone(), index.clone(), engine));

        let original = KnowledgeArticle::new("Old title", "Old body.", "account", vec![]).unwrap();
        articles.save(&original).await.unwrap();
        let id = *original.id();

        let task = {
            let knowledge = knowledge.clone();
            tokio::spawn(async move { knowledge.reembed(&id).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        let mut edited = original.clone();
        edited.edit("New title", "New body.", vec![]).unwrap();
        articles.save(&edited).await.unwrap();

        let outcome = task.await.unwrap().unwrap();
        assert_eq!(outcome, EmbedOutcome::Deferred);

        let stored = articles.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.title(), "New title");
        assert!(!stored.is_embedded());
        assert!(index.is_empty().await);
    }

    #[tokio::test]
    async fn removing_drops_the_vector() {
        let f = fixture();
        let (stored, _) = f.knowledge.index_article(article()).await.unwrap();
        f.knowledge.remove_article(stored.id()).await.unwrap();

        assert!(f.index.is_empty().await);
        let err = f.knowledge.remove_article(stored.id()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ArticleNotFound);
    }
}

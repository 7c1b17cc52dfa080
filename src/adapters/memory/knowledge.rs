//! In-memory knowledge base.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{ArticleId, DomainError, ErrorCode};
use crate::domain::support::KnowledgeArticle;
use crate::ports::KnowledgeRepository;

/// Articles kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKnowledgeRepository {
    articles: Arc<RwLock<Vec<KnowledgeArticle>>>,
}

impl InMemoryKnowledgeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.articles.read().await.is_empty()
    }
}

#[async_trait]
impl KnowledgeRepository for InMemoryKnowledgeRepository {
    async fn save(&self, article: &KnowledgeArticle) -> Result<(), DomainError> {
        let mut articles = self.articles.write().await;
        match articles.iter_mut().find(|a| a.id() == article.id()) {
            Some(stored) => *stored = article.clone(),
            None => articles.push(article.clone()),
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<KnowledgeArticle>, DomainError> {
        Ok(self.articles.read().await.iter().find(|a| a.id() == id).cloned())
    }

    async fn delete(&self, id: &ArticleId) -> Result<(), DomainError> {
        let mut articles = self.articles.write().await;
        let before = articles.len();
        articles.retain(|a| a.id() != id);
        if articles.len() == before {
            return Err(DomainError::new(ErrorCode::ArticleNotFound, "Article not found")
                .with_detail("article_id", id.to_string()));
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<KnowledgeArticle>, DomainError> {
        Ok(self.articles.read().await.clone())
    }
}

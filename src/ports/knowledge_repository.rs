//! Knowledge repository port.

use async_trait::async_trait;

use crate::domain::foundation::{ArticleId, DomainError};
use crate::domain::support::KnowledgeArticle;

/// Repository port for knowledge articles.
#[async_trait]
pub trait KnowledgeRepository: Send + Sync {
    /// Insert or replace an article.
    async fn save(&self, article: &KnowledgeArticle) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<KnowledgeArticle>, DomainError>;

    /// Remove an article.
    ///
    /// # Errors
    ///
    /// - `ArticleNotFound` if the article doesn't exist
    async fn delete(&self, id: &ArticleId) -> Result<(), DomainError>;

    /// All articles in insertion order.
    async fn list_all(&self) -> Result<Vec<KnowledgeArticle>, DomainError>;
}

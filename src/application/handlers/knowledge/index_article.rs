//! IndexArticleHandler - Command handler for adding or editing a knowledge article.
//!
//! The article is stored first and embedded afterwards, so an embedding
//! outage never loses an edit; the article stays searchable lexically until
//! a later re-embed succeeds.

use std::sync::Arc;

use crate::application::services::{EmbedOutcome, KnowledgeIndex};
use crate::domain::foundation::{ArticleId, DomainError, ErrorCode};
use crate::domain::support::KnowledgeArticle;
use crate::ports::KnowledgeRepository;

/// Command to create an article, or replace the text of an existing one.
#[derive(Debug, Clone)]
pub struct IndexArticleCommand {
    /// Existing article to edit; a new article is created when absent.
    pub article_id: Option<ArticleId>,
    pub title: String,
    pub body: String,
    pub category: String,
    pub tags: Vec<String>,
}

impl IndexArticleCommand {
    pub fn create(
        title: impl Into<String>,
        body: impl Into<String>,
        category: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            article_id: None,
            title: title.into(),
            body: body.into(),
            category: category.into(),
            tags,
        }
    }

    pub fn editing(mut self, article_id: ArticleId) -> Self {
        self.article_id = Some(article_id);
        self
    }
}

#[derive(Debug, Clone)]
pub struct IndexArticleResult {
    pub article: KnowledgeArticle,
    pub outcome: EmbedOutcome,
}

pub struct IndexArticleHandler {
    articles: Arc<dyn KnowledgeRepository>,
    index: Arc<KnowledgeIndex>,
}

impl IndexArticleHandler {
    pub fn new(articles: Arc<dyn KnowledgeRepository>, index: Arc<KnowledgeIndex>) -> Self {
        Self { articles, index }
    }

    pub async fn handle(&self, cmd: IndexArticleCommand) -> Result<IndexArticleResult, DomainError> {
        let article = match cmd.article_id {
            Some(id) => {
                let mut article = self.articles.find_by_id(&id).await?.ok_or_else(|| {
                    DomainError::new(ErrorCode::ArticleNotFound, "Article not found")
                        .with_detail("article_id", id.to_string())
                })?;
                article.edit(cmd.title, cmd.body, cmd.tags)?;
                article.set_category(cmd.category);
                article
            }
            None => KnowledgeArticle::new(cmd.title, cmd.body, cmd.category, cmd.tags)?,
        };

        let (article, outcome) = self.index.index_article(article).await?;
        tracing::info!(article_id = %article.id(), outcome = ?outcome, "Article indexed");

        Ok(IndexArticleResult { article, outcome })
    }
}

//! RemoveArticleHandler - Command handler for deleting a knowledge article.

use std::sync::Arc;

use crate::application::services::KnowledgeIndex;
use crate::domain::foundation::{ArticleId, DomainError};

#[derive(Debug, Clone)]
pub struct RemoveArticleCommand {
    pub article_id: ArticleId,
}

pub struct RemoveArticleHandler {
    index: Arc<KnowledgeIndex>,
}

impl RemoveArticleHandler {
    pub fn new(index: Arc<KnowledgeIndex>) -> Self {
        Self { index }
    }

    pub async fn handle(&self, cmd: RemoveArticleCommand) -> Result<(), DomainError> {
        self.index.remove_article(&cmd.article_id).await?;
        tracing::info!(article_id = %cmd.article_id, "Article removed");
        Ok(())
    }
}

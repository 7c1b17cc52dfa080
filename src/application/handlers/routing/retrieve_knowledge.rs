//! RetrieveKnowledgeHandler - Query handler for knowledge lookups.

use std::sync::Arc;

use crate::application::services::KnowledgeRetriever;
use crate::domain::foundation::DomainError;
use crate::domain::routing::{ConfidenceBands, RetrievalResult};

/// Query for the articles best matching `query`.
#[derive(Debug, Clone)]
pub struct RetrieveKnowledgeQuery {
    pub query: String,
    /// Defaults to the configured `top_k`.
    pub top_k: Option<usize>,
}

impl RetrieveKnowledgeQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: None,
        }
    }
}

pub struct RetrieveKnowledgeHandler {
    retriever: Arc<KnowledgeRetriever>,
    bands: ConfidenceBands,
}

impl RetrieveKnowledgeHandler {
    pub fn new(retriever: Arc<KnowledgeRetriever>, bands: ConfidenceBands) -> Self {
        Self { retriever, bands }
    }

    pub async fn handle(&self, query: RetrieveKnowledgeQuery) -> Result<RetrievalResult, DomainError> {
        let top_k = query.top_k.unwrap_or(self.retriever.settings().top_k);
        if top_k == 0 {
            return Err(DomainError::validation("top_k", "top_k must be at least 1"));
        }
        self.retriever.retrieve(&query.query, top_k, &self.bands).await
    }
}

//! Vector Index Port - nearest-neighbour search over article embeddings.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::ArticleId;

/// A scored neighbour; `score` is cosine similarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub article_id: ArticleId,
    pub score: f64,
}

/// Port for vector storage and search.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Inserts or replaces the vector for an article.
    async fn upsert(&self, article_id: ArticleId, vector: Vec<f32>) -> Result<(), IndexError>;

    /// Removes an article; removing an unknown id is not an error.
    async fn remove(&self, article_id: &ArticleId) -> Result<(), IndexError>;

    /// Returns up to `top_k` neighbours, best first.
    async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<Neighbor>, IndexError>;

    /// Ids currently indexed.
    async fn indexed_ids(&self) -> Result<Vec<ArticleId>, IndexError>;
}

/// Errors from vector indexes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    #[error("vector index unavailable: {0}")]
    Unavailable(String),

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_index_is_object_safe() {
        fn _accepts_dyn(_index: &dyn VectorIndex) {}
    }
}

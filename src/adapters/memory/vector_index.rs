//! In-memory vector index with exact cosine search.
//!
//! Entries are immutable `Arc` snapshots swapped in under the write lock;
//! searches clone the current snapshot and score it with no lock held.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::ArticleId;
use crate::domain::routing::cosine_similarity;
use crate::ports::{IndexError, Neighbor, VectorIndex};

type Entries = Arc<HashMap<ArticleId, Arc<[f32]>>>;

#[derive(Debug, Clone, Default)]
pub struct InMemoryVectorIndex {
    entries: Arc<RwLock<Entries>>,
}

impl InMemoryVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn snapshot(&self) -> Entries {
        Arc::clone(&*self.entries.read().await)
    }
}

fn dimension(entries: &HashMap<ArticleId, Arc<[f32]>>) -> Option<usize> {
    entries.values().next().map(|v| v.len())
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn upsert(&self, article_id: ArticleId, vector: Vec<f32>) -> Result<(), IndexError> {
        let mut guard = self.entries.write().await;
        // Replacing the sole entry may change the dimension.
        let expected = guard
            .iter()
            .find(|(id, _)| **id != article_id)
            .map(|(_, existing)| existing.len());
        if let Some(expected) = expected.filter(|len| *len != vector.len()) {
            return Err(IndexError::DimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }
        let mut next = HashMap::clone(&guard);
        next.insert(article_id, Arc::from(vector));
        *guard = Arc::new(next);
        Ok(())
    }

    async fn remove(&self, article_id: &ArticleId) -> Result<(), IndexError> {
        let mut guard = self.entries.write().await;
        if guard.contains_key(article_id) {
            let mut next = HashMap::clone(&guard);
            next.remove(article_id);
            *guard = Arc::new(next);
        }
        Ok(())
    }

    async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<Neighbor>, IndexError> {
        let entries = self.snapshot().await;
        if let Some(expected) = dimension(&entries) {
            if expected != query.len() {
                return Err(IndexError::DimensionMismatch {
                    expected,
                    actual: query.len(),
                });
            }
        }

        let mut neighbors: Vec<Neighbor> = entries
            .iter()
            .map(|(id, vector)| Neighbor {
                article_id: *id,
                score: cosine_similarity(query, vector),
            })
            .collect();
        neighbors.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.article_id.cmp(&b.article_id))
        });
        neighbors.truncate(top_k);
        Ok(neighbors)
    }

    async fn indexed_ids(&self) -> Result<Vec<ArticleId>, IndexError> {
        Ok(self.snapshot().await.keys().copied().collect())
    }
}

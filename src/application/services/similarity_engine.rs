//! Similarity engine - bounded embedding calls plus the intent example cache.
//!
//! Example phrases are embedded once per category and cached until the
//! category's phrases change. Embedding happens outside every lock; a result
//! computed for phrases that were replaced in the meantime is discarded.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::timeout;

use crate::domain::routing::{cosine_similarity, IntentCategory};
use crate::ports::{EmbeddingError, EmbeddingProvider};

/// Phrases of one category with their cached embeddings.
#[derive(Debug, Clone, Default)]
struct CategoryEntry {
    phrases: Arc<Vec<String>>,
    /// Bumped whenever `phrases` changes.
    generation: u64,
    embeddings: Option<Arc<Vec<Vec<f32>>>>,
}

/// Owned cache of intent example phrases and their embeddings.
#[derive(Debug, Default)]
pub struct IntentExampleCache {
    entries: RwLock<BTreeMap<IntentCategory, CategoryEntry>>,
}

impl IntentExampleCache {
    pub fn new(examples: BTreeMap<IntentCategory, Vec<String>>) -> Self {
        let entries = examples
            .into_iter()
            .map(|(category, phrases)| {
                (
                    category,
                    CategoryEntry {
                        phrases: Arc::new(phrases),
                        ..CategoryEntry::default()
                    },
                )
            })
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Current phrases for a category.
    pub async fn phrases(&self, category: IntentCategory) -> Vec<String> {
        self.entries
            .read()
            .await
            .get(&category)
            .map(|e| e.phrases.as_ref().clone())
            .unwrap_or_default()
    }

    /// Adds a phrase unless an equal one (ignoring case and surrounding
    /// whitespace) exists. Invalidates the category on insert.
    pub async fn add_example(&self, category: IntentCategory, phrase: &str) -> bool {
        let phrase = phrase.trim();
        if phrase.is_empty() {
            return false;
        }

        let mut entries = self.entries.write().await;
        let entry = entries.entry(category).or_default();
        if entry
            .phrases
            .iter()
            .any(|p| p.trim().eq_ignore_ascii_case(phrase))
        {
            return false;
        }

        let mut phrases = entry.phrases.as_ref().clone();
        phrases.push(phrase.to_string());
        entry.phrases = Arc::new(phrases);
        entry.generation += 1;
        entry.embeddings = None;
        true
    }

    /// Drops cached embeddings for a category.
    pub async fn invalidate(&self, category: IntentCategory) {
        if let Some(entry) = self.entries.write().await.get_mut(&category) {
            entry.embeddings = None;
            entry.generation += 1;
        }
    }

    pub async fn is_cached(&self, category: IntentCategory) -> bool {
        self.entries
            .read()
            .await
            .get(&category)
            .map_or(false, |e| e.embeddings.is_some())
    }

    async fn snapshot(&self, category: IntentCategory) -> Option<CategoryEntry> {
        self.entries.read().await.get(&category).cloned()
    }

    async fn store(&self, category: IntentCategory, generation: u64, embeddings: Arc<Vec<Vec<f32>>>) {
        if let Some(entry) = self.entries.write().await.get_mut(&category) {
            if entry.generation == generation {
                entry.embeddings = Some(embeddings);
            }
        }
    }
}

/// Embedding access with a per-call time budget.
pub struct SimilarityEngine {
    provider: Arc<dyn EmbeddingProvider>,
    timeout: Duration,
    examples: Arc<IntentExampleCache>,
}

impl SimilarityEngine {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        examples: Arc<IntentExampleCache>,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            timeout,
            examples,
        }
    }

    pub fn examples(&self) -> &Arc<IntentExampleCache> {
        &self.examples
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Embeds `text`, failing with `Timeout` past the budget.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match timeout(self.timeout, self.provider.embed(text)).await {
            Ok(result) => result,
            Err(_) => Err(EmbeddingError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        }
    }

    /// Cosine similarity in `[-1, 1]`.
    pub fn similarity(&self, a: &[f32], b: &[f32]) -> f64 {
        cosine_similarity(a, b)
    }

    /// Embeddings of a category's example phrases, computed on first use.
    ///
    /// Empty when the category has no phrases.
    pub async fn example_embeddings(
        &self,
        category: IntentCategory,
    ) -> Result<Arc<Vec<Vec<f32>>>, EmbeddingError> {
        let Some(entry) = self.examples.snapshot(category).await else {
            return Ok(Arc::new(Vec::new()));
        };
        if let Some(cached) = entry.embeddings {
            return Ok(cached);
        }

        let mut vectors = Vec::with_capacity(entry.phrases.len());
        for phrase in entry.phrases.iter() {
            vectors.push(self.embed(phrase).await?);
        }
        let vectors = Arc::new(vectors);
        tracing::debug!(
            category = %category,
            phrases = vectors.len(),
            "Cached intent example embeddings"
        );
        self.examples
            .store(category, entry.generation, Arc::clone(&vectors))
            .await;
        Ok(vectors)
    }
}

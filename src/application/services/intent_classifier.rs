//! Intent classifier - nearest example by embedding, keywords as fallback.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::SimilarityEngine;
use crate::domain::routing::{
    classify_by_keywords, ClassificationMethod, IntentCategory, IntentClassification,
};
use crate::ports::EmbeddingError;

pub struct IntentClassifier {
    engine: Arc<SimilarityEngine>,
}

impl IntentClassifier {
    pub fn new(engine: Arc<SimilarityEngine>) -> Self {
        Self { engine }
    }

    /// Classifies a message. Never fails: an unavailable embedding backend
    /// degrades to keyword matching.
    pub async fn classify(&self, text: &str) -> IntentClassification {
        match self.classify_by_embedding(text).await {
            Ok(classification) => classification,
            Err(err) => {
                tracing::warn!(
                    provider = self.engine.provider_name(),
                    error = %err,
                    "Embedding unavailable, classifying by keywords"
                );
                classify_by_keywords(text)
            }
        }
    }

    /// Scores each category by its best-matching example.
    ///
    /// The confidence is the winning raw similarity, clamped into `[0, 1]`;
    /// the per-category scores are reported as computed.
    pub async fn classify_by_embedding(&self, text: &str) -> Result<IntentClassification, EmbeddingError> {
        let query = self.engine.embed(text).await?;

        let mut scores = BTreeMap::new();
        for category in IntentCategory::ALL {
            let examples = self.engine.example_embeddings(category).await?;
            let best = examples
                .iter()
                .map(|example| self.engine.similarity(&query, example))
                .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))));
            if let Some(score) = best {
                scores.insert(category, score);
            }
        }

        let classification = IntentClassification::from_scores(scores, ClassificationMethod::Embedding);
        tracing::debug!(
            intent = %classification.intent,
            confidence = %classification.confidence,
            "Classified by embedding"
        );
        Ok(classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{HashingEmbedder, ScriptedEmbedder};
    use crate::application::services::IntentExampleCache;
    use crate::domain::routing::DEFAULT_EXAMPLES;
    use std::time::Duration;

    fn classifier(embedder: Arc<dyn crate::ports::EmbeddingProvider>) -> IntentClassifier {
        let cache = Arc::new(IntentExampleCache::new(DEFAULT_EXAMPLES.clone()));
        IntentClassifier::new(Arc::new(SimilarityEngine::new(
            embedder,
            cache,
            Duration::from_secs(1),
        )))
    }

    #[tokio::test]
    async fn exact_example_wins_with_full_confidence() {
        let classifier = classifier(Arc::new(HashingEmbedder::default()));
        let result = classifier.classify("Where is my order?").await;

        assert_eq!(result.intent, IntentCategory::OrderInquiry);
        assert_eq!(result.method, ClassificationMethod::Embedding);
        assert!((result.confidence.value() - 1.0).abs() < 1e-6);
        assert_eq!(result.scores.len(), IntentCategory::ALL.len());
    }

    #[tokio::test]
    async fn falls_back_to_keywords_when_embeddings_fail() {
        let classifier = classifier(Arc::new(ScriptedEmbedder::unavailable()));
        let result = classifier.classify("My package arrived damaged").await;

        assert_eq!(result.method, ClassificationMethod::Keyword);
        assert_eq!(result.intent, IntentCategory::Complaint);
    }

    #[tokio::test]
    async fn negative_similarity_is_clamped_to_zero() {
        let embedder = ScriptedEmbedder::new()
            .with_vector("query", vec![-1.0, 0.0])
            .with_default_vector(vec![1.0, 0.0]);
        let result = classifier(Arc::new(embedder)).classify("query").await;

        assert_eq!(result.confidence.value(), 0.0);
        assert!(result.scores.values().all(|s| *s < 0.0));
    }
}

//! Offline hashing embedder.
//!
//! A deterministic bag-of-words embedding: each lowercase alphanumeric token
//! is hashed into one of `dimensions` buckets and the count vector is
//! L2-normalized. Texts sharing vocabulary land close together in cosine
//! space, which is enough to run the router without a model backend.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::ports::{EmbeddingError, EmbeddingProvider};

pub const DEFAULT_DIMENSIONS: usize = 128;

/// Deterministic token-hashing embedder.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
    offline: Arc<AtomicBool>,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

impl HashingEmbedder {
    /// Creates an embedder; zero dimensions are bumped to one.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Simulates an outage; clones share the switch.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn bucket(&self, token: &str) -> usize {
        let digest = Sha256::digest(token.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        (u64::from_be_bytes(prefix) % self.dimensions as u64) as usize
    }

    /// Embeds synchronously. Text with no tokens yields the zero vector.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .for_each(|token| vector[self.bucket(&token.to_lowercase())] += 1.0);

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(EmbeddingError::unavailable("hashing embedder switched offline"));
        }
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        Ok(self.embed_text(text))
    }

    fn provider_name(&self) -> &str {
        "hashing"
    }
}

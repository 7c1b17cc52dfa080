//! Knowledge base article with its owned embedding.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::foundation::{ArticleId, DomainError, ErrorCode, Timestamp};

/// An embedding stamped with the fingerprint of the text it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleEmbedding {
    vector: Vec<f32>,
    fingerprint: String,
}

impl ArticleEmbedding {
    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// A support article used to ground automated answers.
///
/// # Invariants
///
/// - `title` and `body` are non-empty
/// - the embedding, when present, matches the current text fingerprint;
///   any edit to title, body or tags drops it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeArticle {
    id: ArticleId,
    title: String,
    body: String,
    category: String,
    tags: Vec<String>,
    embedding: Option<ArticleEmbedding>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl KnowledgeArticle {
    /// Creates an article that is not yet embedded.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title or body is blank
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        category: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        let body = body.into();
        Self::validate_text(&title, &body)?;

        let now = Timestamp::now();
        Ok(Self {
            id: ArticleId::new(),
            title,
            body,
            category: category.into(),
            tags: normalize_tags(tags),
            embedding: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> &ArticleId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Title, body and tags joined for indexing and lexical search.
    pub fn searchable_text(&self) -> String {
        format!("{} {} {}", self.title, self.body, self.tags.join(" "))
    }

    /// SHA-256 hex digest of title, body and tags.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.title.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.body.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.tags.join(",").as_bytes());
        hex::encode(hasher.finalize())
    }

    /// The embedding vector, if the article has been embedded.
    pub fn embedding(&self) -> Option<&[f32]> {
        self.embedding.as_ref().map(|e| e.vector())
    }

    pub fn is_embedded(&self) -> bool {
        self.embedding.is_some()
    }

    /// Attaches an embedding computed from the text with `fingerprint`.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the fingerprint no longer matches, meaning the
    ///   article was edited while the embedding was being computed
    pub fn attach_embedding(
        &mut self,
        vector: Vec<f32>,
        fingerprint: impl Into<String>,
    ) -> Result<(), DomainError> {
        let fingerprint = fingerprint.into();
        if fingerprint != self.fingerprint() {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                "Embedding was computed from outdated article text",
            )
            .with_detail("article_id", self.id.to_string()));
        }
        self.embedding = Some(ArticleEmbedding { vector, fingerprint });
        Ok(())
    }

    /// Replaces title, body and tags, dropping the embedding.
    pub fn edit(
        &mut self,
        title: impl Into<String>,
        body: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<(), DomainError> {
        let title = title.into();
        let body = body.into();
        Self::validate_text(&title, &body)?;

        self.title = title;
        self.body = body;
        self.tags = normalize_tags(tags);
        self.embedding = None;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Recategorizes without touching the embedding.
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
        self.updated_at = Timestamp::now();
    }

    fn validate_text(title: &str, body: &str) -> Result<(), DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::validation("title", "Article title cannot be empty"));
        }
        if body.trim().is_empty() {
            return Err(DomainError::validation("body", "Article body cannot be empty"));
        }
        Ok(())
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

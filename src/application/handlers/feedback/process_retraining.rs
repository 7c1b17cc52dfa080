//! ProcessRetrainingHandler - Command handler for the feedback pipeline run.
//!
//! One run converts outstanding corrective feedback, re-embeds articles the
//! corrections disagree with, teaches the intent classifier new examples and
//! marks every record processed. Runs are single-flight: a trigger arriving
//! while a run is in progress is rejected, not queued.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::application::services::{EmbedOutcome, FeedbackConverter, IntentExampleCache, KnowledgeIndex};
use crate::domain::foundation::{ArticleId, DomainError, ErrorCode, Timestamp};
use crate::domain::routing::{classify_by_keywords, coverage, IntentCategory};
use crate::domain::support::TrainingRecord;
use crate::ports::{FeedbackRepository, KnowledgeRepository};

/// Share of correction tokens an article must contain to be left alone.
pub const DEFAULT_ARTICLE_OVERLAP_FLOOR: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessRetrainingResult {
    pub records_processed: usize,
    pub articles_reembedded: usize,
    pub examples_added: usize,
}

#[derive(Debug, Clone, Error)]
pub enum ProcessRetrainingError {
    #[error("A retraining run is already in progress")]
    ConcurrentRetrainingRejected,

    #[error("Storage error: {0}")]
    Storage(DomainError),
}

impl From<DomainError> for ProcessRetrainingError {
    fn from(err: DomainError) -> Self {
        ProcessRetrainingError::Storage(err)
    }
}

impl From<ProcessRetrainingError> for DomainError {
    fn from(err: ProcessRetrainingError) -> Self {
        match err {
            ProcessRetrainingError::ConcurrentRetrainingRejected => DomainError::new(
                ErrorCode::ConcurrentRetrainingRejected,
                "A retraining run is already in progress",
            ),
            ProcessRetrainingError::Storage(err) => err,
        }
    }
}

pub struct ProcessRetrainingHandler {
    feedback: Arc<dyn FeedbackRepository>,
    articles: Arc<dyn KnowledgeRepository>,
    knowledge: Arc<KnowledgeIndex>,
    examples: Arc<IntentExampleCache>,
    converter: Arc<FeedbackConverter>,
    overlap_floor: f64,
    running: Mutex<()>,
}

impl ProcessRetrainingHandler {
    pub fn new(
        feedback: Arc<dyn FeedbackRepository>,
        articles: Arc<dyn KnowledgeRepository>,
        knowledge: Arc<KnowledgeIndex>,
        examples: Arc<IntentExampleCache>,
        converter: Arc<FeedbackConverter>,
    ) -> Self {
        Self {
            feedback,
            articles,
            knowledge,
            examples,
            converter,
            overlap_floor: DEFAULT_ARTICLE_OVERLAP_FLOOR,
            running: Mutex::new(()),
        }
    }

    pub fn with_overlap_floor(mut self, overlap_floor: f64) -> Self {
        self.overlap_floor = overlap_floor;
        self
    }

    pub async fn handle(&self) -> Result<ProcessRetrainingResult, ProcessRetrainingError> {
        let _guard = self
            .running
            .try_lock()
            .map_err(|_| ProcessRetrainingError::ConcurrentRetrainingRejected)?;

        // 1. Convert outstanding feedback
        for feedback in self.feedback.list_unconsumed_with_correction().await? {
            self.converter.convert(&feedback).await?;
        }

        let mut records = self.feedback.list_unprocessed().await?;
        if records.is_empty() {
            tracing::info!("Retraining found nothing to process");
            return Ok(ProcessRetrainingResult::default());
        }

        // 2. Re-embed articles the corrections disagree with
        let articles_reembedded = self.reembed_divergent_articles(&records).await?;

        // 3. Teach the classifier misclassified questions
        let mut examples_added = 0;
        for record in &records {
            if self.learn_example(record).await {
                examples_added += 1;
            }
        }

        // 4. Mark processed
        let now = Timestamp::now();
        for record in &mut records {
            if record.mark_processed(now) {
                self.feedback.update_training_record(record).await?;
            }
        }

        let result = ProcessRetrainingResult {
            records_processed: records.len(),
            articles_reembedded,
            examples_added,
        };
        tracing::info!(
            records_processed = result.records_processed,
            articles_reembedded = result.articles_reembedded,
            examples_added = result.examples_added,
            "Retraining run complete"
        );
        Ok(result)
    }

    async fn reembed_divergent_articles(&self, records: &[TrainingRecord]) -> Result<usize, DomainError> {
        let mut divergent = BTreeSet::new();
        for record in records {
            for article_id in &record.article_ids {
                if divergent.contains(article_id) {
                    continue;
                }
                let Some(article) = self.articles.find_by_id(article_id).await? else {
                    continue;
                };
                if coverage(&record.correction, &article.searchable_text()) < self.overlap_floor {
                    divergent.insert(*article_id);
                }
            }
        }

        let outcomes = join_all(divergent.iter().map(|id| self.reembed(id))).await;
        let mut reembedded = 0;
        for outcome in outcomes {
            if outcome? == EmbedOutcome::Embedded {
                reembedded += 1;
            }
        }
        Ok(reembedded)
    }

    async fn reembed(&self, article_id: &ArticleId) -> Result<EmbedOutcome, DomainError> {
        match self.knowledge.reembed(article_id).await {
            Err(err) if err.code == ErrorCode::ArticleNotFound => {
                tracing::debug!(article_id = %article_id, "Article removed before re-embedding");
                Ok(EmbedOutcome::Unchanged)
            }
            other => other,
        }
    }

    /// Adds the customer's question under the corrected intent. Returns true
    /// when a new example was stored.
    async fn learn_example(&self, record: &TrainingRecord) -> bool {
        let Some(question) = record.customer_message.as_deref() else {
            return false;
        };
        let corrected = record.corrected_intent.or_else(|| {
            let inferred = classify_by_keywords(&record.correction).intent;
            (inferred != IntentCategory::General).then_some(inferred)
        });
        match corrected {
            Some(category) if Some(category) != record.intent => {
                let added = self.examples.add_example(category, question).await;
                if added {
                    tracing::debug!(intent = %category, record_id = %record.id, "Intent example added");
                }
                added
            }
            _ => false,
        }
    }
}

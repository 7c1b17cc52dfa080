//! ExportTrainingDataHandler - Query handler for the JSON Lines training corpus.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{DomainError, TimeWindow};
use crate::domain::support::TrainingExample;
use crate::ports::FeedbackRepository;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Storage error: {0}")]
    Storage(#[from] DomainError),

    #[error("Failed to serialize training example: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// Query for records processed within `window`.
#[derive(Debug, Clone)]
pub struct ExportTrainingDataQuery {
    pub window: TimeWindow,
}

pub struct ExportTrainingDataHandler {
    feedback: Arc<dyn FeedbackRepository>,
}

impl ExportTrainingDataHandler {
    pub fn new(feedback: Arc<dyn FeedbackRepository>) -> Self {
        Self { feedback }
    }

    /// Training examples for processed records, oldest first.
    pub async fn handle(&self, query: ExportTrainingDataQuery) -> Result<Vec<TrainingExample>, ExportError> {
        let mut records = self.feedback.list_processed_in(&query.window).await?;
        records.sort_by_key(|r| r.processed_at);
        Ok(records.iter().map(|r| r.to_example()).collect())
    }

    /// Writes one JSON object per line and returns the number written.
    pub async fn write_jsonl<W: Write>(
        &self,
        query: ExportTrainingDataQuery,
        mut writer: W,
    ) -> Result<usize, ExportError> {
        let examples = self.handle(query).await?;
        for example in &examples {
            serde_json::to_writer(&mut writer, example)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(examples.len())
    }

    /// Writes the export to `path`, replacing any existing file.
    pub async fn export_to_file(
        &self,
        query: ExportTrainingDataQuery,
        path: impl AsRef<Path>,
    ) -> Result<usize, ExportError> {
        let mut buffer = Vec::new();
        let count = self.write_jsonl(query, &mut buffer).await?;
        tokio::fs::write(path.as_ref(), buffer).await?;
        tracing::info!(path = %path.as_ref().display(), examples = count, "Training data exported");
        Ok(count)
    }
}

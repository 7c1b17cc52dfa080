//! Feedback handlers - intake, the retraining pipeline and corpus export.

mod export_training_data;
mod process_retraining;
mod submit_feedback;

pub use export_training_data::{ExportError, ExportTrainingDataHandler, ExportTrainingDataQuery};
pub use process_retraining::{
    ProcessRetrainingError, ProcessRetrainingHandler, ProcessRetrainingResult,
    DEFAULT_ARTICLE_OVERLAP_FLOOR,
};
pub use submit_feedback::{SubmitFeedbackCommand, SubmitFeedbackHandler, SubmitFeedbackResult};

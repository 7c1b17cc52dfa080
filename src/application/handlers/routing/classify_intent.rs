//! ClassifyIntentHandler - Query handler for classifying a message on its own.

use std::sync::Arc;

use crate::application::services::IntentClassifier;
use crate::domain::foundation::DomainError;
use crate::domain::routing::IntentClassification;

/// Query to classify one piece of customer text.
#[derive(Debug, Clone)]
pub struct ClassifyIntentQuery {
    pub text: String,
}

pub struct ClassifyIntentHandler {
    classifier: Arc<IntentClassifier>,
}

impl ClassifyIntentHandler {
    pub fn new(classifier: Arc<IntentClassifier>) -> Self {
        Self { classifier }
    }

    pub async fn handle(&self, query: ClassifyIntentQuery) -> Result<IntentClassification, DomainError> {
        let text = query.text.trim();
        if text.is_empty() {
            return Err(DomainError::validation("text", "Text to classify cannot be empty"));
        }
        Ok(self.classifier.classify(text).await)
    }
}

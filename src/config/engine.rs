//! Decision engine configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::routing::{default_handoff_keywords, DecisionThresholds, EscalationPolicy};

/// Thresholds and escalation keywords for the routing decision.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub thresholds: DecisionThresholds,

    /// Phrases that request a human; matched case-insensitively.
    #[serde(default = "default_handoff_keywords")]
    pub handoff_keywords: Vec<String>,
}

impl EngineConfig {
    pub fn escalation_policy(&self) -> EscalationPolicy {
        EscalationPolicy::new(self.handoff_keywords.clone())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.thresholds
            .validate()
            .map_err(|e| ValidationError::InvalidThresholds(e.message))?;
        if self.handoff_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ValidationError::MissingRequired("engine.handoff_keywords"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: DecisionThresholds::default(),
            handoff_keywords: default_handoff_keywords(),
        }
    }
}

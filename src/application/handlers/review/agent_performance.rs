//! AgentPerformanceHandler - Query handler for review activity metrics.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, TimeWindow};
use crate::domain::support::{AgentAction, AgentActionType};
use crate::ports::AgentActivityRepository;

#[derive(Debug, Clone)]
pub struct AgentPerformanceQuery {
    pub window: TimeWindow,
}

/// Review activity within a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPerformance {
    pub total_actions: usize,
    /// Approvals as a percentage of all actions, two decimals; 0 without actions.
    pub approval_rate: f64,
    pub correction_frequency: usize,
    pub action_breakdown: BTreeMap<AgentActionType, usize>,
}

impl AgentPerformance {
    pub fn compute(actions: &[AgentAction], corrections: usize) -> Self {
        let mut action_breakdown = BTreeMap::new();
        for action in actions {
            *action_breakdown.entry(action.action).or_insert(0) += 1;
        }
        let approvals = action_breakdown.get(&AgentActionType::Approve).copied().unwrap_or(0);
        let approval_rate = if actions.is_empty() {
            0.0
        } else {
            (approvals as f64 / actions.len() as f64 * 10_000.0).round() / 100.0
        };

        Self {
            total_actions: actions.len(),
            approval_rate,
            correction_frequency: corrections,
            action_breakdown,
        }
    }
}

pub struct AgentPerformanceHandler {
    activity: Arc<dyn AgentActivityRepository>,
}

impl AgentPerformanceHandler {
    pub fn new(activity: Arc<dyn AgentActivityRepository>) -> Self {
        Self { activity }
    }

    pub async fn handle(&self, query: AgentPerformanceQuery) -> Result<AgentPerformance, DomainError> {
        let actions = self.activity.actions_in(&query.window).await?;
        let corrections = self.activity.corrections_in(&query.window).await?;
        Ok(AgentPerformance::compute(&actions, corrections.len()))
    }
}

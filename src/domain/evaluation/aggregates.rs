//! Window aggregates over evaluation records and conversations.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::TimeWindow;
use crate::domain::support::{Conversation, EvaluationRecord};

/// Arithmetic mean; `None` for an empty input.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Share of conversations not escalated; `None` with no conversations.
pub fn deflection_rate<'a, I>(conversations: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a Conversation>,
{
    let (escalated, total) = conversations
        .into_iter()
        .fold((0usize, 0usize), |(escalated, total), c| {
            (escalated + usize::from(c.is_escalated()), total + 1)
        });
    (total > 0).then(|| 1.0 - escalated as f64 / total as f64)
}

/// Response-quality metrics for one time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub window: TimeWindow,
    pub mean_overlap: Option<f64>,
    pub mean_semantic_similarity: Option<f64>,
    pub mean_satisfaction: Option<f64>,
    pub deflection_rate: Option<f64>,
    pub evaluation_samples: usize,
    pub similarity_samples: usize,
    pub satisfaction_samples: usize,
    pub conversation_samples: usize,
}

impl EvaluationSummary {
    /// Aggregates records and conversations already filtered to `window`.
    pub fn compute(
        window: TimeWindow,
        records: &[EvaluationRecord],
        conversations: &[Conversation],
    ) -> Self {
        let similarities: Vec<f64> = records.iter().filter_map(|r| r.semantic_similarity).collect();
        let satisfaction: Vec<f64> = conversations
            .iter()
            .filter_map(|c| c.satisfaction().map(|s| s.value() as f64))
            .collect();

        Self {
            window,
            mean_overlap: mean(records.iter().map(|r| r.overlap_score)),
            mean_semantic_similarity: mean(similarities.iter().copied()),
            mean_satisfaction: mean(satisfaction.iter().copied()),
            deflection_rate: deflection_rate(conversations),
            evaluation_samples: records.len(),
            similarity_samples: similarities.len(),
            satisfaction_samples: satisfaction.len(),
            conversation_samples: conversations.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ConversationId, CustomerId, MessageId};
    use crate::domain::support::SatisfactionScore;

    fn conversation(escalated: bool, satisfaction: Option<u8>) -> Conversation {
        let mut c = Conversation::start(CustomerId::new("c").unwrap());
        if escalated {
            c.escalate().unwrap();
        }
        if let Some(s) = satisfaction {
            c.rate(SatisfactionScore::new(s).unwrap());
        }
        c
    }

    #[test]
    fn mean_of_nothing_is_none() {
        assert_eq!(mean(Vec::<f64>::new()), None);
        assert_eq!(mean(vec![1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn deflection_counts_escalations() {
        let convs = vec![
            conversation(true, None),
            conversation(false, None),
            conversation(false, None),
            conversation(false, None),
        ];
        assert_eq!(deflection_rate(&convs), Some(0.75));
        assert_eq!(deflection_rate(Vec::<Conversation>::new().iter()), None);
    }

    #[test]
    fn empty_window_reports_none_everywhere() {
        let summary = EvaluationSummary::compute(TimeWindow::unbounded(), &[], &[]);
        assert_eq!(summary.mean_overlap, None);
        assert_eq!(summary.mean_semantic_similarity, None);
        assert_eq!(summary.mean_satisfaction, None);
        assert_eq!(summary.deflection_rate, None);
        assert_eq!(summary.conversation_samples, 0);
    }

    #[test]
    fn similarity_ignores_missing_values() {
        let records = vec![
            EvaluationRecord::new(MessageId::new(), ConversationId::new(), 0.2, Some(0.9)),
            EvaluationRecord::new(MessageId::new(), ConversationId::new(), 0.4, None),
        ];
        let convs = vec![conversation(false, Some(4)), conversation(false, None)];
        let summary = EvaluationSummary::compute(TimeWindow::unbounded(), &records, &convs);

        assert!((summary.mean_overlap.unwrap() - 0.3).abs() < 1e-9);
        assert_eq!(summary.mean_semantic_similarity, Some(0.9));
        assert_eq!(summary.similarity_samples, 1);
        assert_eq!(summary.mean_satisfaction, Some(4.0));
        assert_eq!(summary.satisfaction_samples, 1);
    }
}

//! Operational dashboard metrics: conversation outcomes, confidence and
//! feedback sentiment, as a window total or as daily buckets.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::mean;
use crate::domain::foundation::TimeWindow;
use crate::domain::support::{Conversation, ConversationStatus, Feedback, FeedbackRating, Message};

/// Longest daily series a single query returns.
pub const MAX_SERIES_DAYS: u32 = 90;

fn share(part: usize, total: usize) -> Option<f64> {
    (total > 0).then(|| part as f64 / total as f64)
}

fn mean_confidence<'a, I>(messages: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a Message>,
{
    mean(messages.into_iter().filter_map(|m| m.confidence().map(|c| c.value())))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub total: usize,
    pub active: usize,
    pub resolved: usize,
    pub escalated: usize,
}

impl OutcomeCounts {
    fn record(&mut self, conversation: &Conversation) {
        self.total += 1;
        match conversation.status() {
            ConversationStatus::Active => self.active += 1,
            ConversationStatus::Resolved => self.resolved += 1,
            ConversationStatus::Escalated => self.escalated += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingCounts {
    pub helpful: usize,
    pub not_helpful: usize,
    pub needs_improvement: usize,
}

impl RatingCounts {
    fn record(&mut self, rating: FeedbackRating) {
        match rating {
            FeedbackRating::Helpful => self.helpful += 1,
            FeedbackRating::NotHelpful => self.not_helpful += 1,
            FeedbackRating::NeedsImprovement => self.needs_improvement += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.helpful + self.not_helpful + self.needs_improvement
    }
}

/// Window totals. Rates are fractions in [0,1], `None` without samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMetrics {
    pub window: TimeWindow,
    pub conversations: OutcomeCounts,
    pub resolution_rate: Option<f64>,
    pub escalation_rate: Option<f64>,
    pub mean_confidence: Option<f64>,
    pub feedback: RatingCounts,
    /// Share of feedback rated helpful.
    pub feedback_sentiment: Option<f64>,
}

impl ProductMetrics {
    /// Aggregates inputs already filtered to `window`.
    pub fn compute(
        window: TimeWindow,
        conversations: &[Conversation],
        messages: &[Message],
        feedback: &[Feedback],
    ) -> Self {
        let mut outcomes = OutcomeCounts::default();
        conversations.iter().for_each(|c| outcomes.record(c));
        let mut ratings = RatingCounts::default();
        feedback.iter().for_each(|f| ratings.record(f.rating));

        Self {
            window,
            resolution_rate: share(outcomes.resolved, outcomes.total),
            escalation_rate: share(outcomes.escalated, outcomes.total),
            conversations: outcomes,
            mean_confidence: mean_confidence(messages),
            feedback_sentiment: share(ratings.helpful, ratings.total()),
            feedback: ratings,
        }
    }
}

/// One UTC day of the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetrics {
    pub date: NaiveDate,
    pub conversations: OutcomeCounts,
    pub mean_confidence: Option<f64>,
    pub feedback: RatingCounts,
}

impl DailyMetrics {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            conversations: OutcomeCounts::default(),
            mean_confidence: None,
            feedback: RatingCounts::default(),
        }
    }
}

/// Buckets inputs by UTC creation day over `days` days from `first_day`.
/// Days without activity are present with zero counts; inputs outside the
/// range are ignored.
pub fn daily_series(
    first_day: NaiveDate,
    days: u32,
    conversations: &[Conversation],
    messages: &[Message],
    feedback: &[Feedback],
) -> Vec<DailyMetrics> {
    let mut buckets: BTreeMap<NaiveDate, DailyMetrics> = (0..i64::from(days))
        .map(|offset| first_day + Duration::days(offset))
        .map(|date| (date, DailyMetrics::empty(date)))
        .collect();

    for conversation in conversations {
        if let Some(day) = buckets.get_mut(&conversation.created_at().date()) {
            day.conversations.record(conversation);
        }
    }
    for item in feedback {
        if let Some(day) = buckets.get_mut(&item.created_at.date()) {
            day.feedback.record(item.rating);
        }
    }

    let mut by_day: BTreeMap<NaiveDate, Vec<&Message>> = BTreeMap::new();
    for message in messages {
        by_day.entry(message.created_at().date()).or_default().push(message);
    }
    for (date, day_messages) in by_day {
        if let Some(day) = buckets.get_mut(&date) {
            day.mean_confidence = mean_confidence(day_messages);
        }
    }

    buckets.into_values().collect()
}

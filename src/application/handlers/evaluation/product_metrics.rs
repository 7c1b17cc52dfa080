//! Query handlers for dashboard metrics: window totals and a daily series.

use std::sync::Arc;

use crate::domain::evaluation::{daily_series, DailyMetrics, ProductMetrics, MAX_SERIES_DAYS};
use crate::domain::foundation::{DomainError, TimeWindow, Timestamp};
use crate::ports::{ConversationRepository, FeedbackRepository};

#[derive(Debug, Clone)]
pub struct ProductMetricsQuery {
    pub window: TimeWindow,
}

pub struct ProductMetricsHandler {
    conversations: Arc<dyn ConversationRepository>,
    feedback: Arc<dyn FeedbackRepository>,
}

impl ProductMetricsHandler {
    pub fn new(conversations: Arc<dyn ConversationRepository>, feedback: Arc<dyn FeedbackRepository>) -> Self {
        Self {
            conversations,
            feedback,
        }
    }

    pub async fn handle(&self, query: ProductMetricsQuery) -> Result<ProductMetrics, DomainError> {
        let window = query.window;
        let conversations = self.conversations.list_created_in(&window).await?;
        let messages = self.conversations.list_messages_in(&window).await?;
        let feedback = self.feedback.list_feedback_in(&window).await?;

        let metrics = ProductMetrics::compute(window, &conversations, &messages, &feedback);
        tracing::debug!(
            conversations = metrics.conversations.total,
            feedback = metrics.feedback.total(),
            "Product metrics computed"
        );
        Ok(metrics)
    }
}

/// Daily buckets for the trailing `days` UTC days, today included.
#[derive(Debug, Clone)]
pub struct DailyMetricsQuery {
    pub days: u32,
}

pub struct DailyMetricsHandler {
    conversations: Arc<dyn ConversationRepository>,
    feedback: Arc<dyn FeedbackRepository>,
}

impl DailyMetricsHandler {
    pub fn new(conversations: Arc<dyn ConversationRepository>, feedback: Arc<dyn FeedbackRepository>) -> Self {
        Self {
            conversations,
            feedback,
        }
    }

    /// # Errors
    ///
    /// - `ValidationFailed` if `days` is zero or above [`MAX_SERIES_DAYS`]
    pub async fn handle(&self, query: DailyMetricsQuery) -> Result<Vec<DailyMetrics>, DomainError> {
        if query.days == 0 || query.days > MAX_SERIES_DAYS {
            return Err(DomainError::validation(
                "days",
                format!("must be between 1 and {}", MAX_SERIES_DAYS),
            ));
        }

        let today = Timestamp::now().date();
        let first_day = today - chrono::Duration::days(i64::from(query.days) - 1);
        let window = TimeWindow::new(
            Timestamp::start_of_day(first_day),
            Timestamp::start_of_day(today).plus_secs(86_400),
        )?;

        let conversations = self.conversations.list_created_in(&window).await?;
        let messages = self.conversations.list_messages_in(&window).await?;
        let feedback = self.feedback.list_feedback_in(&window).await?;
        Ok(daily_series(first_day, query.days, &conversations, &messages, &feedback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryConversationRepository, InMemoryFeedbackRepository};
    use crate::domain::foundation::{Confidence, CustomerId, ErrorCode, MessageId};
    use crate::domain::routing::IntentCategory;
    use crate::domain::support::{AgentType, Conversation, Feedback, FeedbackRating, Message, ResponseMeta};

    struct Fixture {
        conversations: Arc<InMemoryConversationRepository>,
        feedback: Arc<InMemoryFeedbackRepository>,
    }

    fn fixture() -> Fixture {
        Fixture {
            conversations: Arc::new(InMemoryConversationRepository::new()),
            feedback: Arc::new(InMemoryFeedbackRepository::new()),
        }
    }

    async fn answered(f: &Fixture, confidence: f64, created: Timestamp) -> Conversation {
        let conversation = Conversation::start(CustomerId::new("c").unwrap()).with_created_at(created);
        f.conversations.save(&conversation).await.unwrap();
        let answer = Message::response(
            *conversation.id(),
            "See the returns page.",
            ResponseMeta {
                reply_to: MessageId::new(),
                confidence: Confidence::new(confidence),
                intent: IntentCategory::Faq,
                agent_type: AgentType::Knowledge,
                articles: vec![],
                auto_sent: true,
            },
        )
        .unwrap()
        .with_created_at(created);
        f.conversations.add_message(&answer).await.unwrap();
        conversation
    }

    #[tokio::test]
    async fn window_totals_cover_conversations_messages_and_feedback() {
        let f = fixture();
        let now = Timestamp::now();
        let first = answered(&f, 0.85, now).await;
        answered(&f, 0.65, now).await;
        answered(&f, 0.3, now.minus_days(10)).await;
        f.feedback
            .save_feedback(&Feedback::new(*first.id(), FeedbackRating::Helpful))
            .await
            .unwrap();

        let metrics = ProductMetricsHandler::new(f.conversations.clone(), f.feedback.clone())
            .handle(ProductMetricsQuery {
                window: TimeWindow::last_days(1),
            })
            .await
            .unwrap();

        assert_eq!(metrics.conversations.total, 2);
        assert_eq!(metrics.conversations.active, 2);
        assert_eq!(metrics.resolution_rate, Some(0.0));
        assert!((metrics.mean_confidence.unwrap() - 0.75).abs() < 1e-9);
        assert_eq!(metrics.feedback_sentiment, Some(1.0));
    }

    #[tokio::test]
    async fn daily_series_ends_today_and_fills_gaps() {
        let f = fixture();
        let now = Timestamp::now();
        answered(&f, 0.4, now).await;
        answered(&f, 0.85, now.minus_days(2)).await;
        answered(&f, 0.85, now.minus_days(30)).await;

        let series = DailyMetricsHandler::new(f.conversations.clone(), f.feedback.clone())
            .handle(DailyMetricsQuery { days: 7 })
            .await
            .unwrap();

        assert_eq!(series.len(), 7);
        assert_eq!(series[6].date, now.date());
        assert_eq!(series[6].conversations.total, 1);
        assert_eq!(series[6].mean_confidence, Some(0.4));
        assert_eq!(series[4].conversations.total, 1);
        assert_eq!(series[5].conversations.total, 0);
        assert_eq!(series[5].mean_confidence, None);
        assert_eq!(series.iter().map(|d| d.conversations.total).sum::<usize>(), 2);
    }

    #[tokio::test]
    async fn series_length_is_bounded() {
        let f = fixture();
        let handler = DailyMetricsHandler::new(f.conversations, f.feedback);
        for days in [0, MAX_SERIES_DAYS + 1] {
            let err = handler.handle(DailyMetricsQuery { days }).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationFailed);
        }
    }
}

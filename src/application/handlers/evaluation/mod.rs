//! Evaluation handlers.

mod compute_evaluation_metrics;
mod product_metrics;

pub use compute_evaluation_metrics::{ComputeEvaluationMetricsHandler, ComputeEvaluationMetricsQuery};
pub use product_metrics::{DailyMetricsHandler, DailyMetricsQuery, ProductMetricsHandler, ProductMetricsQuery};

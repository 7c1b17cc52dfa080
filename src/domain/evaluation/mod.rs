//! Evaluation domain - response quality, product metrics and experiment statistics.

mod aggregates;
mod overlap_score;
mod product_metrics;
mod variant_assignment;
mod variant_scoring;

pub use aggregates::{deflection_rate, mean, EvaluationSummary};
pub use overlap_score::bleu;
pub use product_metrics::{
    daily_series, DailyMetrics, OutcomeCounts, ProductMetrics, RatingCounts, MAX_SERIES_DAYS,
};
pub use variant_assignment::{assign, bucket};
pub use variant_scoring::{weighted_score, Leader, VariantComparison, VariantMetrics};

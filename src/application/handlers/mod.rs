//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations, one per
//! exposed operation, grouped by concern.

pub mod evaluation;
pub mod experiments;
pub mod feedback;
pub mod knowledge;
pub mod review;
pub mod routing;

//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, confidence, timestamps, errors)
//! - `routing` - Intent classification, retrieval scoring and the escalation decision
//! - `support` - Conversations, articles, feedback, experiments and agent activity
//! - `evaluation` - Response quality metrics and variant comparison

pub mod evaluation;
pub mod foundation;
pub mod routing;
pub mod support;

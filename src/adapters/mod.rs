//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - embedding and generation backends
//! - `memory` - in-memory repositories and vector index
//! - `resilience` - circuit breaking around the generation backend

pub mod ai;
pub mod memory;
pub mod resilience;

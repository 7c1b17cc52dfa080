//! Resilience adapters for the model backends.

mod circuit_breaker;
mod guarded_generator;

pub use circuit_breaker::InMemoryCircuitBreaker;
pub use guarded_generator::GuardedGenerator;

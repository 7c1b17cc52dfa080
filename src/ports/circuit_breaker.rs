//! CircuitBreaker port - resilience for the embedding and generation backends.
//!
//! ## States
//!
//! - **Closed**: Normal operation, requests flow through
//! - **Open**: Too many failures, requests rejected immediately
//! - **Half-Open**: Testing if the backend recovered
//!
//! ```text
//! Closed --[failure_threshold consecutive failures]--> Open
//! Open --[recovery_timeout elapsed]--> Half-Open
//! Half-Open --[success_threshold successes]--> Closed
//! Half-Open --[any failure]--> Open
//! ```

use std::time::Duration;

/// Circuit breaker states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    /// Check if the circuit allows requests through.
    pub fn allows_requests(&self) -> bool {
        matches!(self, CircuitState::Closed | CircuitState::HalfOpen)
    }
}

/// Configuration for circuit breaker behavior.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before opening.
    pub failure_threshold: u32,

    /// Time to wait before probing the backend again.
    pub recovery_timeout: Duration,

    /// Successes in half-open state needed to close.
    pub success_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(30),
            success_threshold: 3,
        }
    }
}

impl CircuitBreakerConfig {
    /// Tighter settings for model backends, which fail slowly.
    pub fn for_ai_provider() -> Self {
        Self {
            failure_threshold: 3,
            recovery_timeout: Duration::from_secs(60),
            success_threshold: 2,
        }
    }
}

/// Port for circuit breaker functionality.
///
/// # Example
///
/// ```ignore
/// if !breaker.should_allow() {
///     return Err(GenerationError::unavailable("circuit open"));
/// }
/// match inner.generate(request).await {
///     Ok(text) => { breaker.record_success(); Ok(text) }
///     Err(e) => { breaker.record_failure(); Err(e) }
/// }
/// ```
pub trait CircuitBreaker: Send + Sync {
    /// Current state, accounting for an elapsed recovery timeout.
    fn state(&self) -> CircuitState;

    /// Check if a request should be allowed through.
    fn should_allow(&self) -> bool;

    fn record_success(&self);

    fn record_failure(&self);

    /// Force reset the circuit to closed state.
    fn reset(&self);

    fn metrics(&self) -> CircuitBreakerMetrics;
}

/// Metrics about circuit breaker behavior.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CircuitBreakerMetrics {
    pub state: Option<CircuitState>,
    pub total_successes: u64,
    pub total_failures: u64,
    pub times_opened: u64,
    pub current_failures: u32,
}

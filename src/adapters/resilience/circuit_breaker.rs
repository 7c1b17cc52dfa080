//! In-process circuit breaker.

use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use crate::ports::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerMetrics, CircuitState};

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    consecutive_failures: u32,
    half_open_successes: u32,
    opened_at: Option<Instant>,
    total_successes: u64,
    total_failures: u64,
    times_opened: u64,
}

/// Consecutive-failure circuit breaker guarded by a mutex.
///
/// The lock is never held across an await; callers check `should_allow`,
/// make the call, then record the outcome.
#[derive(Debug)]
pub struct InMemoryCircuitBreaker {
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

impl InMemoryCircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                half_open_successes: 0,
                opened_at: None,
                total_successes: 0,
                total_failures: 0,
                times_opened: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Moves Open to HalfOpen once the recovery timeout has elapsed.
    fn refresh(&self, inner: &mut Inner) {
        if inner.state == CircuitState::Open {
            let elapsed = inner
                .opened_at
                .map(|at| at.elapsed() >= self.config.recovery_timeout)
                .unwrap_or(true);
            if elapsed {
                inner.state = CircuitState::HalfOpen;
                inner.half_open_successes = 0;
                tracing::info!("Circuit half-open, probing backend");
            }
        }
    }

    fn open(&self, inner: &mut Inner) {
        inner.state = CircuitState::Open;
        inner.opened_at = Some(Instant::now());
        inner.half_open_successes = 0;
        inner.times_opened += 1;
        tracing::warn!(
            failures = inner.consecutive_failures,
            recovery_secs = self.config.recovery_timeout.as_secs(),
            "Circuit opened"
        );
    }
}

impl CircuitBreaker for InMemoryCircuitBreaker {
    fn state(&self) -> CircuitState {
        let mut inner = self.lock();
        self.refresh(&mut inner);
        inner.state
    }

    fn should_allow(&self) -> bool {
        self.state().allows_requests()
    }

    fn record_success(&self) {
        let mut inner = self.lock();
        self.refresh(&mut inner);
        inner.total_successes += 1;
        inner.consecutive_failures = 0;
        if inner.state == CircuitState::HalfOpen {
            inner.half_open_successes += 1;
            if inner.half_open_successes >= self.config.success_threshold {
                inner.state = CircuitState::Closed;
                inner.opened_at = None;
                tracing::info!("Circuit closed");
            }
        }
    }

    fn record_failure(&self) {
        let mut inner = self.lock();
        self.refresh(&mut inner);
        inner.total_failures += 1;
        inner.consecutive_failures += 1;
        match inner.state {
            CircuitState::HalfOpen => self.open(&mut inner),
            CircuitState::Closed if inner.consecutive_failures >= self.config.failure_threshold => {
                self.open(&mut inner)
            }
            _ => {}
        }
    }

    fn reset(&self) {
        let mut inner = self.lock();
        inner.state = CircuitState::Closed;
        inner.consecutive_failures = 0;
        inner.half_open_successes = 0;
        inner.opened_at = None;
    }

    fn metrics(&self) -> CircuitBreakerMetrics {
        let mut inner = self.lock();
        self.refresh(&mut inner);
        CircuitBreakerMetrics {
            state: Some(inner.state),
            total_successes: inner.total_successes,
            total_failures: inner.total_failures,
            times_opened: inner.times_opened,
            current_failures: inner.consecutive_failures,
        }
    }
}

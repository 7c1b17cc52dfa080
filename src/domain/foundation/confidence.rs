//! Confidence value object (0.0-1.0 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A score in the closed unit interval.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// Zero confidence.
    pub const ZERO: Self = Self(0.0);

    /// Full confidence, used for escalation handoffs.
    pub const CERTAIN: Self = Self(1.0);

    /// Creates a Confidence, clamping into `[0, 1]`. NaN maps to zero.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Creates a Confidence, returning error if out of range.
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        ValidationError::check_unit_interval("confidence", value)?;
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// True when this confidence meets `threshold` (inclusive).
    pub fn meets(&self, threshold: f64) -> bool {
        self.0 >= threshold
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

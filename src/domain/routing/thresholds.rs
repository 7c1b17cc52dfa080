//! Decision thresholds and retrieval confidence bands.
//!
//! All tunable numbers that drive routing live here so that a configuration
//! variant can override them as a single validated unit.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Confidence, DomainError};

fn default_escalation_floor() -> f64 {
    0.4
}

fn default_technical_support_floor() -> f64 {
    0.6
}

fn default_auto_send() -> f64 {
    0.65
}

/// Thresholds for the escalate / auto-send decisions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionThresholds {
    /// Intent confidence below this escalates.
    #[serde(default = "default_escalation_floor")]
    pub escalation_floor: f64,

    /// Stricter floor applied to technical support intents.
    #[serde(default = "default_technical_support_floor")]
    pub technical_support_floor: f64,

    /// Knowledge answers at or above this confidence are sent without review.
    #[serde(default = "default_auto_send")]
    pub auto_send: f64,

    #[serde(default)]
    pub bands: ConfidenceBands,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            escalation_floor: default_escalation_floor(),
            technical_support_floor: default_technical_support_floor(),
            auto_send: default_auto_send(),
            bands: ConfidenceBands::default(),
        }
    }
}

impl DecisionThresholds {
    /// Validates every threshold and the band table.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` naming the first offending field.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [
            ("escalation_floor", self.escalation_floor),
            ("technical_support_floor", self.technical_support_floor),
            ("auto_send", self.auto_send),
        ] {
            if value.is_nan() || !(0.0..=1.0).contains(&value) {
                return Err(DomainError::invalid_configuration(
                    field,
                    format!("{} must be within [0, 1], got {}", field, value),
                ));
            }
        }
        self.bands.validate()
    }

    /// True when a knowledge answer at `confidence` may be sent unreviewed.
    pub fn should_auto_send(&self, confidence: Confidence) -> bool {
        confidence.meets(self.auto_send)
    }
}

/// Maps a raw retrieval score onto a calibrated confidence.
///
/// A score strictly above a cutoff earns that cutoff's confidence. Cutoffs
/// are checked from highest to lowest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceBands {
    pub high_cutoff: f64,
    pub high: f64,
    pub medium_cutoff: f64,
    pub medium: f64,
    pub low_cutoff: f64,
    pub low: f64,
    /// Confidence for weak matches and for no match at all.
    pub floor: f64,
}

impl Default for ConfidenceBands {
    fn default() -> Self {
        Self {
            high_cutoff: 0.7,
            high: 0.85,
            medium_cutoff: 0.5,
            medium: 0.65,
            low_cutoff: 0.3,
            low: 0.4,
            floor: 0.3,
        }
    }
}

impl ConfidenceBands {
    /// Calibrates the best retrieval score; `None` means nothing matched.
    pub fn calibrate(&self, best_score: Option<f64>) -> Confidence {
        let value = match best_score {
            Some(s) if s > self.high_cutoff => self.high,
            Some(s) if s > self.medium_cutoff => self.medium,
            Some(s) if s > self.low_cutoff => self.low,
            _ => self.floor,
        };
        Confidence::new(value)
    }

    fn validate(&self) -> Result<(), DomainError> {
        let fields = [
            ("bands.high_cutoff", self.high_cutoff),
            ("bands.high", self.high),
            ("bands.medium_cutoff", self.medium_cutoff),
            ("bands.medium", self.medium),
            ("bands.low_cutoff", self.low_cutoff),
            ("bands.low", self.low),
            ("bands.floor", self.floor),
        ];
        for (field, value) in fields {
            if value.is_nan() || !(0.0..=1.0).contains(&value) {
                return Err(DomainError::invalid_configuration(
                    field,
                    format!("{} must be within [0, 1], got {}", field, value),
                ));
            }
        }

        if !(self.high_cutoff > self.medium_cutoff && self.medium_cutoff > self.low_cutoff) {
            return Err(DomainError::invalid_configuration(
                "bands",
                "band cutoffs must be strictly decreasing",
            ));
        }
        if !(self.high >= self.medium && self.medium >= self.low && self.low >= self.floor) {
            return Err(DomainError::invalid_configuration(
                "bands",
                "band confidences must not increase as cutoffs decrease",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn defaults_are_valid() {
        assert!(DecisionThresholds::default().validate().is_ok());
    }

    #[test]
    fn calibrate_uses_strict_cutoffs() {
        let bands = ConfidenceBands::default();
        assert_eq!(bands.calibrate(Some(0.71)).value(), 0.85);
        assert_eq!(bands.calibrate(Some(0.7)).value(), 0.65);
        assert_eq!(bands.calibrate(Some(0.6)).value(), 0.65);
        assert_eq!(bands.calibrate(Some(0.5)).value(), 0.4);
        assert_eq!(bands.calibrate(Some(0.31)).value(), 0.4);
        assert_eq!(bands.calibrate(Some(0.3)).value(), 0.3);
        assert_eq!(bands.calibrate(None).value(), 0.3);
    }

    #[test]
    fn auto_send_is_inclusive() {
        let thresholds = DecisionThresholds::default();
        assert!(thresholds.should_auto_send(Confidence::new(0.65)));
        assert!(!thresholds.should_auto_send(Confidence::new(0.4)));
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let thresholds = DecisionThresholds {
            auto_send: 1.2,
            ..Default::default()
        };
        let err = thresholds.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfiguration);
        assert_eq!(err.details.get("field"), Some(&"auto_send".to_string()));
    }

    #[test]
    fn non_monotonic_bands_are_rejected() {
        let thresholds = DecisionThresholds {
            bands: ConfidenceBands {
                medium: 0.9,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(thresholds.validate().is_err());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let thresholds: DecisionThresholds = serde_yaml::from_str("auto_send: 0.8\n").unwrap();
        assert_eq!(thresholds.auto_send, 0.8);
        assert_eq!(thresholds.escalation_floor, 0.4);
        assert_eq!(thresholds.bands, ConfidenceBands::default());
    }
}

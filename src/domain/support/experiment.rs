//! Configuration variants and A/B experiments.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, ExperimentId, StateMachine, Timestamp, ValidationError, VariantId,
};
use crate::domain::routing::{DecisionThresholds, PromptTemplate};

fn default_index_version() -> String {
    "default".to_string()
}

/// Serialized form of a variant bundle, as stored in YAML files.
#[derive(Debug, Clone, Deserialize)]
struct VariantBundle {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default = "default_index_version")]
    index_version: String,
    #[serde(default)]
    prompt_template: Option<String>,
    #[serde(default)]
    thresholds: DecisionThresholds,
}

/// A named configuration bundle that an experiment can route traffic to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigVariant {
    pub id: VariantId,
    pub name: String,
    pub description: Option<String>,
    pub index_version: String,
    /// Overrides the default prompt when present.
    pub prompt_template: Option<String>,
    pub thresholds: DecisionThresholds,
    pub created_at: Timestamp,
}

impl ConfigVariant {
    pub fn new(name: impl Into<String>, thresholds: DecisionThresholds) -> Self {
        Self {
            id: VariantId::new(),
            name: name.into(),
            description: None,
            index_version: default_index_version(),
            prompt_template: None,
            thresholds,
            created_at: Timestamp::now(),
        }
    }

    pub fn with_prompt_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = Some(template.into());
        self
    }

    pub fn with_index_version(mut self, version: impl Into<String>) -> Self {
        self.index_version = version.into();
        self
    }

    /// Parses and validates a variant bundle from YAML.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` if the YAML is malformed or fails validation
    pub fn from_yaml(yaml: &str) -> Result<Self, DomainError> {
        let bundle: VariantBundle = serde_yaml::from_str(yaml).map_err(|e| {
            DomainError::invalid_configuration("variant", format!("Invalid variant YAML: {}", e))
        })?;

        let variant = Self {
            id: VariantId::new(),
            name: bundle.name,
            description: bundle.description,
            index_version: bundle.index_version,
            prompt_template: bundle.prompt_template,
            thresholds: bundle.thresholds,
            created_at: Timestamp::now(),
        };
        variant.validate()?;
        Ok(variant)
    }

    /// Checks name, thresholds and the prompt template.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid_configuration(
                "name",
                "Variant name cannot be empty",
            ));
        }
        self.thresholds.validate()?;
        self.prompt()?;
        Ok(())
    }

    /// The prompt this variant answers with.
    pub fn prompt(&self) -> Result<PromptTemplate, DomainError> {
        match &self.prompt_template {
            Some(template) => PromptTemplate::new(template.clone()),
            None => Ok(PromptTemplate::default()),
        }
    }
}

/// Lifecycle of an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentStatus {
    #[default]
    Draft,
    Running,
    Concluded,
}

impl StateMachine for ExperimentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ExperimentStatus::*;
        matches!((self, target), (Draft, Running) | (Running, Concluded))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ExperimentStatus::*;
        match self {
            Draft => vec![Running],
            Running => vec![Concluded],
            Concluded => vec![],
        }
    }
}

/// Two variants competing for a share of traffic.
///
/// # Invariants
///
/// - `traffic_split` is the share routed to variant A, within `[0, 1]`
/// - the two variants are distinct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    id: ExperimentId,
    name: String,
    description: Option<String>,
    variant_a: VariantId,
    variant_b: VariantId,
    traffic_split: f64,
    status: ExperimentStatus,
    created_at: Timestamp,
    started_at: Option<Timestamp>,
    concluded_at: Option<Timestamp>,
}

impl Experiment {
    /// Creates a draft experiment.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` for a blank name, identical variants or a
    ///   split outside `[0, 1]`
    pub fn new(
        name: impl Into<String>,
        variant_a: VariantId,
        variant_b: VariantId,
        traffic_split: f64,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::invalid_configuration(
                "name",
                "Experiment name cannot be empty",
            ));
        }
        if variant_a == variant_b {
            return Err(DomainError::invalid_configuration(
                "variant_b",
                "Experiment variants must be distinct",
            ));
        }
        ValidationError::check_unit_interval("traffic_split", traffic_split).map_err(|e| {
            DomainError::invalid_configuration("traffic_split", e.to_string())
        })?;

        Ok(Self {
            id: ExperimentId::new(),
            name,
            description: None,
            variant_a,
            variant_b,
            traffic_split,
            status: ExperimentStatus::Draft,
            created_at: Timestamp::now(),
            started_at: None,
            concluded_at: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> &ExperimentId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn variant_a(&self) -> &VariantId {
        &self.variant_a
    }

    pub fn variant_b(&self) -> &VariantId {
        &self.variant_b
    }

    pub fn traffic_split(&self) -> f64 {
        self.traffic_split
    }

    pub fn status(&self) -> ExperimentStatus {
        self.status
    }

    pub fn started_at(&self) -> Option<&Timestamp> {
        self.started_at.as_ref()
    }

    pub fn concluded_at(&self) -> Option<&Timestamp> {
        self.concluded_at.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.status == ExperimentStatus::Running
    }

    pub fn has_variant(&self, variant: &VariantId) -> bool {
        &self.variant_a == variant || &self.variant_b == variant
    }

    pub fn start(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(ExperimentStatus::Running)?;
        self.started_at = Some(Timestamp::now());
        Ok(())
    }

    pub fn conclude(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(ExperimentStatus::Concluded)?;
        self.concluded_at = Some(Timestamp::now());
        Ok(())
    }

    /// Fails unless the experiment is running.
    pub fn ensure_running(&self) -> Result<(), DomainError> {
        if !self.is_running() {
            return Err(DomainError::new(
                ErrorCode::ExperimentNotRunning,
                format!("Experiment is {:?}, not running", self.status),
            )
            .with_detail("experiment_id", self.id.to_string()));
        }
        Ok(())
    }
}

//! RegisterVariantHandler - Command handler for storing a configuration variant.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::support::ConfigVariant;
use crate::ports::ExperimentRepository;

#[derive(Debug, Clone)]
pub enum RegisterVariantCommand {
    /// A variant built in code.
    Bundle(ConfigVariant),
    /// A variant bundle in YAML.
    Yaml(String),
}

pub struct RegisterVariantHandler {
    experiments: Arc<dyn ExperimentRepository>,
}

impl RegisterVariantHandler {
    pub fn new(experiments: Arc<dyn ExperimentRepository>) -> Self {
        Self { experiments }
    }

    /// # Errors
    ///
    /// - `InvalidConfiguration` for malformed YAML, a blank name, invalid
    ///   thresholds or a prompt template missing a placeholder
    pub async fn handle(&self, cmd: RegisterVariantCommand) -> Result<ConfigVariant, DomainError> {
        let variant = match cmd {
            RegisterVariantCommand::Bundle(variant) => {
                variant.validate()?;
                variant
            }
            RegisterVariantCommand::Yaml(yaml) => ConfigVariant::from_yaml(&yaml)?,
        };
        self.experiments.save_variant(&variant).await?;
        tracing::info!(variant_id = %variant.id, name = %variant.name, "Variant registered");
        Ok(variant)
    }
}

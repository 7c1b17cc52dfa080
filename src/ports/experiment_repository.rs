//! Experiment and configuration variant repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ExperimentId, VariantId};
use crate::domain::support::{ConfigVariant, Experiment};

#[async_trait]
pub trait ExperimentRepository: Send + Sync {
    async fn save_variant(&self, variant: &ConfigVariant) -> Result<(), DomainError>;

    async fn find_variant(&self, id: &VariantId) -> Result<Option<ConfigVariant>, DomainError>;

    /// Insert or replace an experiment.
    async fn save_experiment(&self, experiment: &Experiment) -> Result<(), DomainError>;

    async fn find_experiment(&self, id: &ExperimentId) -> Result<Option<Experiment>, DomainError>;

    async fn list_running(&self) -> Result<Vec<Experiment>, DomainError>;
}

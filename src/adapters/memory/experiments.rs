//! In-memory experiments and configuration variants.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ExperimentId, VariantId};
use crate::domain::support::{ConfigVariant, Experiment};
use crate::ports::ExperimentRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryExperimentRepository {
    variants: Arc<RwLock<HashMap<VariantId, ConfigVariant>>>,
    experiments: Arc<RwLock<HashMap<ExperimentId, Experiment>>>,
}

impl InMemoryExperimentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExperimentRepository for InMemoryExperimentRepository {
    async fn save_variant(&self, variant: &ConfigVariant) -> Result<(), DomainError> {
        self.variants.write().await.insert(variant.id, variant.clone());
        Ok(())
    }

    async fn find_variant(&self, id: &VariantId) -> Result<Option<ConfigVariant>, DomainError> {
        Ok(self.variants.read().await.get(id).cloned())
    }

    async fn save_experiment(&self, experiment: &Experiment) -> Result<(), DomainError> {
        self.experiments
            .write()
            .await
            .insert(*experiment.id(), experiment.clone());
        Ok(())
    }

    async fn find_experiment(&self, id: &ExperimentId) -> Result<Option<Experiment>, DomainError> {
        Ok(self.experiments.read().await.get(id).cloned())
    }

    async fn list_running(&self) -> Result<Vec<Experiment>, DomainError> {
        Ok(self
            .experiments
            .read()
            .await
            .values()
            .filter(|e| e.is_running())
            .cloned()
            .collect())
    }
}

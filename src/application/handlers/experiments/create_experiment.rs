//! CreateExperimentHandler - Command handler for drafting an experiment.

use std::sync::Arc;

use super::load_variant;
use crate::domain::foundation::{DomainError, VariantId};
use crate::domain::support::Experiment;
use crate::ports::ExperimentRepository;

#[derive(Debug, Clone)]
pub struct CreateExperimentCommand {
    pub name: String,
    pub description: Option<String>,
    pub variant_a: VariantId,
    pub variant_b: VariantId,
    /// Share of conversations routed to variant A.
    pub traffic_split: f64,
}

pub struct CreateExperimentHandler {
    experiments: Arc<dyn ExperimentRepository>,
}

impl CreateExperimentHandler {
    pub fn new(experiments: Arc<dyn ExperimentRepository>) -> Self {
        Self { experiments }
    }

    /// Creates the experiment in draft.
    ///
    /// # Errors
    ///
    /// - `VariantNotFound` if either variant is unknown
    /// - `InvalidConfiguration` for a blank name, identical variants, a split
    ///   outside `[0, 1]` or a variant with invalid thresholds
    pub async fn handle(&self, cmd: CreateExperimentCommand) -> Result<Experiment, DomainError> {
        for id in [&cmd.variant_a, &cmd.variant_b] {
            load_variant(self.experiments.as_ref(), id).await?.validate()?;
        }

        let mut experiment = Experiment::new(cmd.name, cmd.variant_a, cmd.variant_b, cmd.traffic_split)?;
        if let Some(description) = cmd.description {
            experiment = experiment.with_description(description);
        }
        self.experiments.save_experiment(&experiment).await?;

        tracing::info!(
            experiment_id = %experiment.id(),
            traffic_split = experiment.traffic_split(),
            "Experiment created"
        );
        Ok(experiment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryExperimentRepository;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::routing::DecisionThresholds;
    use crate::domain::support::{ConfigVariant, ExperimentStatus};

    async fn variants(repo: &InMemoryExperimentRepository) -> (VariantId, VariantId) {
        let a = ConfigVariant::new("control", DecisionThresholds::default());
        let b = ConfigVariant::new("eager", DecisionThresholds::default());
        repo.save_variant(&a).await.unwrap();
        repo.save_variant(&b).await.unwrap();
        (a.id, b.id)
    }

    fn command(a: VariantId, b: VariantId, split: f64) -> CreateExperimentCommand {
        CreateExperimentCommand {
            name: "auto-send threshold".to_string(),
            description: Some("0.65 vs 0.55".to_string()),
            variant_a: a,
            variant_b: b,
            traffic_split: split,
        }
    }

    #[tokio::test]
    async fn creates_draft() {
        let repo = Arc::new(InMemoryExperimentRepository::new());
        let (a, b) = variants(&repo).await;
        let experiment = CreateExperimentHandler::new(repo.clone())
            .handle(command(a, b, 0.5))
            .await
            .unwrap();

        assert_eq!(experiment.status(), ExperimentStatus::Draft);
        assert_eq!(experiment.description(), Some("0.65 vs 0.55"));
        assert!(repo.find_experiment(experiment.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn rejects_invalid_split() {
        let repo = Arc::new(InMemoryExperimentRepository::new());
        let (a, b) = variants(&repo).await;
        let err = CreateExperimentHandler::new(repo)
            .handle(command(a, b, 1.2))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfiguration);
    }

    #[tokio::test]
    async fn rejects_unknown_variant() {
        let repo = Arc::new(InMemoryExperimentRepository::new());
        let (a, _) = variants(&repo).await;
        let err = CreateExperimentHandler::new(repo)
            .handle(command(a, VariantId::new(), 0.5))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::VariantNotFound);
    }

    #[tokio::test]
    async fn rejects_identical_variants() {
        let repo = Arc::new(InMemoryExperimentRepository::new());
        let (a, _) = variants(&repo).await;
        let err = CreateExperimentHandler::new(repo)
            .handle(command(a, a, 0.5))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfiguration);
    }
}

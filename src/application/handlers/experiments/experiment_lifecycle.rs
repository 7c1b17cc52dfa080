//! Start and conclude handlers for the experiment lifecycle.

use std::sync::Arc;

use super::load_experiment;
use crate::domain::foundation::{DomainError, ErrorCode, ExperimentId};
use crate::domain::support::Experiment;
use crate::ports::ExperimentRepository;

#[derive(Debug, Clone)]
pub struct StartExperimentCommand {
    pub experiment_id: ExperimentId,
}

#[derive(Debug, Clone)]
pub struct ConcludeExperimentCommand {
    pub experiment_id: ExperimentId,
}

/// Moves a draft experiment to running. At most one experiment runs at a time.
pub struct StartExperimentHandler {
    experiments: Arc<dyn ExperimentRepository>,
}

impl StartExperimentHandler {
    pub fn new(experiments: Arc<dyn ExperimentRepository>) -> Self {
        Self { experiments }
    }

    pub async fn handle(&self, cmd: StartExperimentCommand) -> Result<Experiment, DomainError> {
        let mut experiment = load_experiment(self.experiments.as_ref(), &cmd.experiment_id).await?;
        let running = self.experiments.list_running().await?;
        if let Some(other) = running.iter().find(|e| e.id() != &cmd.experiment_id) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Another experiment is already running",
            )
            .with_detail("running_experiment_id", other.id().to_string()));
        }
        experiment.start()?;
        self.experiments.save_experiment(&experiment).await?;
        tracing::info!(experiment_id = %cmd.experiment_id, "Experiment started");
        Ok(experiment)
    }
}

/// Moves a running experiment to concluded. Its conversations fall back to
/// the default configuration.
pub struct ConcludeExperimentHandler {
    experiments: Arc<dyn ExperimentRepository>,
}

impl ConcludeExperimentHandler {
    pub fn new(experiments: Arc<dyn ExperimentRepository>) -> Self {
        Self { experiments }
    }

    pub async fn handle(&self, cmd: ConcludeExperimentCommand) -> Result<Experiment, DomainError> {
        let mut experiment = load_experiment(self.experiments.as_ref(), &cmd.experiment_id).await?;
        experiment.conclude()?;
        self.experiments.save_experiment(&experiment).await?;
        tracing::info!(experiment_id = %cmd.experiment_id, "Experiment concluded");
        Ok(experiment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryExperimentRepository;
    use crate::domain::foundation::VariantId;
    use crate::domain::support::ExperimentStatus;

    async fn draft(repo: &InMemoryExperimentRepository) -> ExperimentId {
        let experiment = Experiment::new("e", VariantId::new(), VariantId::new(), 0.5).unwrap();
        repo.save_experiment(&experiment).await.unwrap();
        *experiment.id()
    }

    #[tokio::test]
    async fn draft_runs_then_concludes() {
        let repo = Arc::new(InMemoryExperimentRepository::new());
        let id = draft(&repo).await;
        let start = StartExperimentHandler::new(repo.clone());
        let conclude = ConcludeExperimentHandler::new(repo.clone());

        let running = start.handle(StartExperimentCommand { experiment_id: id }).await.unwrap();
        assert_eq!(running.status(), ExperimentStatus::Running);
        assert!(running.started_at().is_some());

        let done = conclude
            .handle(ConcludeExperimentCommand { experiment_id: id })
            .await
            .unwrap();
        assert_eq!(done.status(), ExperimentStatus::Concluded);
        assert_eq!(
            repo.find_experiment(&id).await.unwrap().unwrap().status(),
            ExperimentStatus::Concluded
        );
    }

    #[tokio::test]
    async fn draft_cannot_conclude() {
        let repo = Arc::new(InMemoryExperimentRepository::new());
        let id = draft(&repo).await;
        let err = ConcludeExperimentHandler::new(repo)
            .handle(ConcludeExperimentCommand { experiment_id: id })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn second_experiment_cannot_start_while_one_runs() {
        let repo = Arc::new(InMemoryExperimentRepository::new());
        let first = draft(&repo).await;
        let second = draft(&repo).await;
        let start = StartExperimentHandler::new(repo.clone());
        let conclude = ConcludeExperimentHandler::new(repo.clone());

        start.handle(StartExperimentCommand { experiment_id: first }).await.unwrap();
        let err = start
            .handle(StartExperimentCommand { experiment_id: second })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert_eq!(
            repo.find_experiment(&second).await.unwrap().unwrap().status(),
            ExperimentStatus::Draft
        );

        conclude.handle(ConcludeExperimentCommand { experiment_id: first }).await.unwrap();
        let running = start.handle(StartExperimentCommand { experiment_id: second }).await.unwrap();
        assert_eq!(running.status(), ExperimentStatus::Running);
    }

    #[tokio::test]
    async fn unknown_experiment_is_not_found() {
        let err = StartExperimentHandler::new(Arc::new(InMemoryExperimentRepository::new()))
            .handle(StartExperimentCommand {
                experiment_id: ExperimentId::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ExperimentNotFound);
    }
}

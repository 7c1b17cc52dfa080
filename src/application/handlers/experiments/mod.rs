//! Experiment handlers - variants, lifecycle, assignment and comparison.

mod assign_variant;
mod compare_variants;
mod create_experiment;
mod experiment_lifecycle;
mod register_variant;

pub use assign_variant::{AssignVariantCommand, AssignVariantHandler, AssignVariantResult};
pub use compare_variants::{CompareVariantsHandler, CompareVariantsQuery};
pub use create_experiment::{CreateExperimentCommand, CreateExperimentHandler};
pub use experiment_lifecycle::{
    ConcludeExperimentCommand, ConcludeExperimentHandler, StartExperimentCommand,
    StartExperimentHandler,
};
pub use register_variant::{RegisterVariantCommand, RegisterVariantHandler};

use crate::domain::foundation::{DomainError, ErrorCode, ExperimentId, VariantId};
use crate::domain::support::{ConfigVariant, Experiment};
use crate::ports::ExperimentRepository;

async fn load_experiment(
    repo: &dyn ExperimentRepository,
    id: &ExperimentId,
) -> Result<Experiment, DomainError> {
    repo.find_experiment(id).await?.ok_or_else(|| {
        DomainError::new(ErrorCode::ExperimentNotFound, "Experiment not found")
            .with_detail("experiment_id", id.to_string())
    })
}

async fn load_variant(repo: &dyn ExperimentRepository, id: &VariantId) -> Result<ConfigVariant, DomainError> {
    repo.find_variant(id).await?.ok_or_else(|| {
        DomainError::new(ErrorCode::VariantNotFound, "Variant not found")
            .with_detail("variant_id", id.to_string())
    })
}

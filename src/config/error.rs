//! Configuration error types

use thiserror::Error;

use crate::domain::foundation::DomainError;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid decision thresholds: {0}")]
    InvalidThresholds(String),

    #[error("Invalid retrieval setting: {0}")]
    InvalidRetrieval(&'static str),

    #[error("Invalid backend URL format")]
    InvalidBaseUrl,

    #[error("Invalid timeout: {0}")]
    InvalidTimeout(&'static str),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}

impl ValidationError {
    /// Configuration key the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingRequired(field) => field,
            ValidationError::InvalidThresholds(_) => "engine.thresholds",
            ValidationError::InvalidRetrieval(field) => field,
            ValidationError::InvalidBaseUrl => "ai.base_url",
            ValidationError::InvalidTimeout(field) => field,
            ValidationError::InvalidLogLevel(_) => "logging.level",
        }
    }
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::invalid_configuration(err.field(), err.to_string())
    }
}

//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `SUPPORT_ROUTER`
//! prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use support_router::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Auto-send at {}", config.engine.thresholds.auto_send);
//! ```

mod ai;
mod engine;
mod error;
mod logging;
mod retrieval;

pub use ai::AiConfig;
pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use retrieval::RetrievalConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// offline router. Load using [`AppConfig::load()`].
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Decision thresholds and handoff keywords
    #[serde(default)]
    pub engine: EngineConfig,

    /// Knowledge retrieval sizes
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Embedding and generation backend
    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SUPPORT_ROUTER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SUPPORT_ROUTER__ENGINE__THRESHOLDS__AUTO_SEND=0.7` -> `engine.thresholds.auto_send`
    /// - `SUPPORT_ROUTER__ENGINE__HANDOFF_KEYWORDS=human,agent` -> comma-separated list
    /// - `SUPPORT_ROUTER__AI__ENABLED=true` -> `ai.enabled`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SUPPORT_ROUTER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("engine.handoff_keywords"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section; it converts
    /// into an `InvalidConfiguration` domain error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.engine.validate()?;
        self.retrieval.validate()?;
        self.ai.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const KEYS: [&str; 5] = [
        "SUPPORT_ROUTER__ENGINE__THRESHOLDS__AUTO_SEND",
        "SUPPORT_ROUTER__ENGINE__HANDOFF_KEYWORDS",
        "SUPPORT_ROUTER__RETRIEVAL__TOP_K",
        "SUPPORT_ROUTER__AI__ENABLED",
        "SUPPORT_ROUTER__LOGGING__JSON",
    ];

    fn clear_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.engine.thresholds.auto_send, 0.65);
        assert_eq!(config.retrieval.top_k, 3);
        assert!(!config.ai.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SUPPORT_ROUTER__ENGINE__THRESHOLDS__AUTO_SEND", "0.8");
        env::set_var("SUPPORT_ROUTER__ENGINE__HANDOFF_KEYWORDS", "human,supervisor");
        env::set_var("SUPPORT_ROUTER__RETRIEVAL__TOP_K", "5");
        env::set_var("SUPPORT_ROUTER__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.engine.thresholds.auto_send, 0.8);
        assert_eq!(config.engine.thresholds.escalation_floor, 0.4);
        assert_eq!(
            config.engine.handoff_keywords,
            vec!["human".to_string(), "supervisor".to_string()]
        );
        assert_eq!(config.retrieval.top_k, 5);
        assert!(config.logging.json);
    }

    #[test]
    fn test_invalid_threshold_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SUPPORT_ROUTER__ENGINE__THRESHOLDS__AUTO_SEND", "2.0");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidThresholds(_)));
    }
}

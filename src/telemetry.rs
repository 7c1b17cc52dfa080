//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured level. Calling it twice is a no-op.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},support_router=debug", config.level)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.json {
        builder.json().with_current_span(false).try_init()
    } else {
        builder.try_init()
    };
    if let Err(err) = result {
        tracing::debug!(error = %err, "Tracing subscriber already installed");
    }
}

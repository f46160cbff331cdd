//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;
use ts_shared::config::{LogFormat, LoggingConfig};

use crate::InfrastructureError;

/// Fallback directive when the configured level does not parse
const DEFAULT_FILTER: &str = "info";

/// Build the event filter for a logging configuration
///
/// `level` accepts either a bare level (`debug`) or a full env-filter
/// expression (`ts_core=trace,redis=warn`).
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_new(&config.level).unwrap_or_else(|e| {
        eprintln!(
            "Invalid log filter '{}': {}. Falling back to '{}'",
            config.level, e, DEFAULT_FILTER
        );
        EnvFilter::new(DEFAULT_FILTER)
    })
}

/// Install the global tracing subscriber
///
/// # Returns
/// * `Ok(())` - Subscriber installed
/// * `Err(InfrastructureError::Config)` - A global subscriber is already set
pub fn init_tracing(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(config))
        .with_target(true)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    result.map_err(|e| InfrastructureError::Config(format!("Failed to install tracing subscriber: {}", e)))
}

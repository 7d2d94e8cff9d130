/*!
 * Logging functionality for habskill.
 *
 * This module provides tracing setup and span helpers shared by the
 * discovery pipeline and the directive dispatcher.
 */
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Initialize the logging system with default configuration
pub fn init() -> Result<()> {
    init_with_filter("info")
}

/// Initialize the logging system from the logging section of the configuration
pub fn init_with_config(config: &LoggingConfig) -> Result<()> {
    init_with_filter(&config.level)
}

/// Initialize the logging system with a specific filter
///
/// # Arguments
///
/// * `filter` - The log filter string (e.g., "info", "debug", "habskill_engine=trace")
pub fn init_with_filter(filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init()
        .map_err(|e| Error::runtime(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// A type alias for a tracing span
pub type Span = tracing::Span;

/// Create a span for one discovered endpoint
///
/// # Arguments
///
/// * `endpoint_id` - The endpoint (item or group) name
pub fn endpoint_span(endpoint_id: &str) -> Span {
    tracing::debug_span!("endpoint", id = %endpoint_id)
}

/// Create a span for a directive being handled
///
/// # Arguments
///
/// * `namespace` - The directive namespace
/// * `name` - The directive name
/// * `message_id` - The directive message id
pub fn directive_span(namespace: &str, name: &str, message_id: &str) -> Span {
    tracing::info_span!("directive", namespace = %namespace, name = %name, message_id = %message_id)
}

//! Tracing subscriber setup for the binary.

use branchtale_error::{BranchtaleResult, ConfigError};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingOptions {
    /// Filter used when `RUST_LOG` is unset (e.g., "info", "branchtale=debug")
    pub level: String,
    /// Enable JSON-formatted logs for structured logging
    pub json: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingOptions {
    /// Set the fallback filter.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Enable JSON-formatted logs.
    pub fn with_json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    fn filter(&self) -> BranchtaleResult<EnvFilter> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .map_err(|e| ConfigError::new(format!("Invalid log filter '{}': {}", self.level, e)).into())
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `options.level`. Logs go to stderr so command output
/// on stdout stays machine-readable.
///
/// # Errors
///
/// Fails on an invalid filter or if a subscriber is already installed.
pub fn init_logging(options: &LoggingOptions) -> BranchtaleResult<()> {
    let env_filter = options.filter()?;

    let fmt_layer = if options.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ConfigError::new(format!("Failed to install tracing subscriber: {}", e)))?;

    Ok(())
}

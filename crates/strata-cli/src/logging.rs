//! Log output for the CLI.
//!
//! Loader events go to stderr so they never mix with `dump` output on
//! stdout.
//!
//! # Example
//!
//! ```rust,ignore
//! use strata_cli::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::from_flags("strata=debug", false);
//! init_logging(&config)?;
//! ```

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::{CliError, CliResult};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive (e.g., "warn", "strata=debug").
    pub level: String,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to include target (module path).
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json_format: false,
            include_target: false,
        }
    }
}

impl LogConfig {
    /// Builds a configuration from the CLI's global flags.
    #[must_use]
    pub fn from_flags(level: &str, json_format: bool) -> Self {
        Self {
            level: level.to_string(),
            json_format,
            include_target: json_format,
        }
    }
}

/// Initializes the global subscriber.
///
/// # Errors
///
/// Returns `CliError::LoggingInit` if the filter is invalid or a subscriber
/// is already installed.
pub fn init_logging(config: &LogConfig) -> CliResult<()> {
    let filter = create_env_filter(&config.level)?;

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;
    }

    Ok(())
}

/// Parses a filter directive.
///
/// # Errors
///
/// Returns `CliError::LoggingInit` if the directive is invalid.
pub fn create_env_filter(filter: &str) -> CliResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| CliError::LoggingInit(format!("Invalid log level: {e}")))
}

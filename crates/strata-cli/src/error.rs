//! Error types for the strata CLI.

use thiserror::Error;

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading or resolving configuration failed.
    #[error(transparent)]
    Load(#[from] strata::LoadError),

    /// Logging could not be initialized.
    #[error("Logging initialization failed: {0}")]
    LoggingInit(String),

    /// JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML output failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

//! Strata CLI - inspect layered configuration from the command line
//!
//! The `strata` binary runs the same loader a service would, so operators can
//! check which files a set of patterns picks up and what the merged result
//! looks like before deploying.
//!
//! # Example Usage
//!
//! ```bash
//! # Which files would be read, and which would be skipped?
//! $ strata resolve -p '/etc/app/app.*' -p '/etc/app/conf.d/*'
//!
//! # Merged view of every matched file
//! $ strata dump -p '/etc/app/app.*' -p '/etc/app/conf.d/*' --output yaml
//!
//! # Patterns from the environment, debug logs as JSON on stderr
//! $ STRATA_PATHS='/etc/app/app.*,/etc/app/conf.d/*' strata --log-level debug --log-json dump
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod args;
pub mod commands;
pub mod error;
pub mod logging;

pub use args::{Cli, Command, OutputFormat};
pub use error::{CliError, CliResult};
pub use logging::{init_logging, LogConfig};

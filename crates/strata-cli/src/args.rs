//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};

/// Top-level command line.
#[derive(Debug, Parser)]
#[command(name = "strata")]
#[command(about = "Inspect layered configuration files", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  strata resolve -p '/etc/app/app.*' -p '/etc/app/conf.d/*'\n  strata dump -p '/etc/app/app.*' --output yaml\n"
)]
pub struct Cli {
    /// Log filter (e.g. "info", "strata=debug")
    #[arg(long, global = true, env = "STRATA_LOG", default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON instead of human-readable text
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the files the patterns resolve to, in merge order
    Resolve {
        /// Glob pattern; repeat for lower-to-higher precedence layers
        #[arg(short = 'p', long = "path", env = "STRATA_PATHS", value_delimiter = ',', required = true)]
        paths: Vec<String>,
    },

    /// Load every matched file into one tree and print it
    Dump {
        /// Glob pattern; repeat for lower-to-higher precedence layers
        #[arg(short = 'p', long = "path", env = "STRATA_PATHS", value_delimiter = ',', required = true)]
        paths: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        output: OutputFormat,
    },
}

/// Output format for `dump`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dump_with_repeated_paths() {
        let cli = Cli::try_parse_from([
            "strata", "dump", "-p", "/etc/app/app.*", "--path", "/etc/app/conf.d/*", "-o", "yaml",
        ])
        .unwrap();

        match cli.command {
            Command::Dump { paths, output } => {
                assert_eq!(paths, vec!["/etc/app/app.*", "/etc/app/conf.d/*"]);
                assert_eq!(output, OutputFormat::Yaml);
            }
            Command::Resolve { .. } => panic!("expected dump"),
        }
    }

    #[test]
    fn test_global_log_flags() {
        let cli = Cli::try_parse_from([
            "strata", "resolve", "-p", "a.toml", "--log-level", "debug", "--log-json",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "debug");
        assert!(cli.log_json);
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

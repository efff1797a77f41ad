//! Strata CLI - Entry point

use anyhow::Context;
use clap::Parser;

use strata_cli::{commands, init_logging, Cli, LogConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&LogConfig::from_flags(&cli.log_level, cli.log_json))
        .context("failed to initialize logging")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&cli.command, &mut out)?;

    Ok(())
}

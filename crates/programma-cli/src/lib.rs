//! Command-line front end for `programma-core`.

pub mod cli_args;

use anyhow::{Context, Result};
use programma_core::{GenerationReport, LoggingDestination, init_logging, run};

pub use cli_args::{Cli, HeaderStyleArg};

/// Prefix of the one-line failure report; the only Italian text the tool prints.
pub const FAILURE_PREFIX: &str = "Errore durante il processing:";

/// The line printed to stdout before exiting with status 1.
pub fn failure_message(err: &anyhow::Error) -> String {
    format!("{FAILURE_PREFIX} {err:#}")
}

/// Install logging and run one generation.
pub fn execute(cli: &Cli) -> Result<GenerationReport> {
    let destination = match &cli.log_file {
        Some(path) => LoggingDestination::FileAndStderr(path.clone()),
        None => LoggingDestination::StderrOnly,
    };
    init_logging(destination).context("failed to initialize logging")?;

    let options = cli.to_options();
    run(&options).with_context(|| {
        format!(
            "failed to generate {} from {}",
            options.paths.document.display(),
            options.paths.config.display()
        )
    })
}

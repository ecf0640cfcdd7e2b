//! Binary entry point for topic-cards.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use anyhow::Context as _;
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use topic_cards::cli::output::{OutputFormat, format_error};
use topic_cards::cli::{Cli, execute};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "TOPIC_CARDS_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.format);

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("Error initializing logging: {e:#}");
        return ExitCode::FAILURE;
    }

    match execute(&cli) {
        Ok(output) => {
            if !output.is_empty() {
                // Piping into `head` closes stdout early
                if let Err(e) = write!(io::stdout(), "{output}")
                    && e.kind() != io::ErrorKind::BrokenPipe
                {
                    eprintln!("Error writing to stdout: {e}");
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            let error_output = format_error(&e, format);
            match format {
                OutputFormat::Json => println!("{error_output}"),
                OutputFormat::Text => eprintln!("Error: {error_output}"),
            }
            ExitCode::FAILURE
        }
    }
}

/// Installs a stderr subscriber filtered by `TOPIC_CARDS_LOG`.
///
/// Without the variable the level is `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .with_context(|| format!("invalid {LOG_ENV} filter '{directives}'"))?,
        _ => EnvFilter::new(default_level),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install tracing subscriber")
}

//! calsync CLI entry point.

use std::io::Read;
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

use calsync_cli::cli::Cli;
use calsync_cli::driver;
use calsync_cli::error::{CliError, CliResult};
use calsync_core::{TracingConfig, init_tracing};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let config = TracingConfig::default()
        .with_level(level)
        .with_log_dir(&cli.log_dir);
    let _guard = match init_tracing(config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Processing failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let raw = read_input(&cli)?;
    // Rejected and not-found outcomes are already logged by the driver and
    // are not process failures.
    driver::handle(&raw, &cli.path)?;
    Ok(())
}

fn read_input(cli: &Cli) -> CliResult<Vec<u8>> {
    match &cli.file {
        Some(path) => std::fs::read(path).map_err(|source| CliError::ReadInput {
            path: path.clone(),
            source,
        }),
        None => {
            let mut raw = Vec::new();
            std::io::stdin()
                .read_to_end(&mut raw)
                .map_err(CliError::ReadStdin)?;
            Ok(raw)
        }
    }
}

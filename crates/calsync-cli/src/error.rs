//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

use calsync_store::StoreError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that terminate the process with a failure exit code.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input file could not be read.
    #[error("failed to read input {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Standard input could not be read.
    #[error("failed to read standard input: {0}")]
    ReadStdin(#[source] std::io::Error),

    /// The calendar store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

//! Tracing setup for calsync.
//!
//! Every terminal outcome is audited through tracing, so the subscriber
//! carries two sinks: a console layer and a daily-rolling file under the
//! configured log directory. The returned [`WorkerGuard`] must be held for
//! the lifetime of the process so buffered log lines are flushed on exit.

use std::path::PathBuf;

use thiserror::Error;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// Failed to set global subscriber
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// Failed to create the log directory
    #[error("failed to create log directory {path}: {source}")]
    LogDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration for tracing initialization
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// The default log level when RUST_LOG is not set
    pub default_level: Level,
    /// Directory for the rolling log file; console-only when unset
    pub log_dir: Option<PathBuf>,
    /// File name prefix of the rolling log file
    pub log_file_name: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            log_dir: None,
            log_file_name: "calsync.log".to_string(),
        }
    }
}

impl TracingConfig {
    /// Set the default log level
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Set the log directory for the rolling file sink
    #[must_use]
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }
}

/// Initialize tracing with the given configuration.
///
/// This should be called once at the start of the application. The
/// `RUST_LOG` environment variable can be used to override the default
/// level. When a log directory is configured, log lines are additionally
/// written to a daily-rotated file in it.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set or if the
/// log directory cannot be created.
pub fn init_tracing(config: TracingConfig) -> Result<Option<WorkerGuard>, TracingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_level.to_string()));

    let console_layer = fmt::layer().with_target(false);

    match config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir).map_err(|source| TracingError::LogDirectory {
                path: dir.clone(),
                source,
            })?;
            let appender = tracing_appender::rolling::daily(&dir, &config.log_file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_writer(writer).with_ansi(false);

            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer);
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(Some(guard))
        }
        None => {
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer);
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(None)
        }
    }
}

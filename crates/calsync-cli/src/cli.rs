//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;

/// calsync - Turn car-sharing reservation emails into calendar events
#[derive(Debug, Parser)]
#[command(name = "calsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the raw email file to process (reads stdin when omitted)
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// Directory holding the reservation.ics document
    #[arg(long, short, default_value = "/var/www/calsync", env = "CALSYNC_PATH")]
    pub path: PathBuf,

    /// Directory for rotated log files
    #[arg(long, short = 'l', default_value = "/var/log/calsync", env = "CALSYNC_LOG_DIR")]
    pub log_dir: PathBuf,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,
}

//! Store error types.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// A specialized Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur operating on the calendar document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading, locking, or writing the document failed.
    #[error("calendar document I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The existing document is not valid iCalendar data. Never treated as
    /// an empty document: rewriting the file would destroy whatever the
    /// operator has in it.
    #[error("calendar document at {path} is not valid iCalendar data: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// More than one stored event matched a cancellation. Substring
    /// matching on the renter name cannot tell them apart, so nothing is
    /// removed.
    #[error("{count} events match renter {renter:?} starting at {start}; refusing to cancel")]
    AmbiguousMatch {
        renter: String,
        start: DateTime<Utc>,
        count: usize,
    },
}

//! Wall-clock to instant conversion in the service's reference timezone.
//!
//! The notification emails print local Paris times with two-digit years
//! (`DD/MM/YY HH:MM`). Everything downstream compares absolute instants, so
//! conversion to UTC happens here, once, at the extraction boundary.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Timezone the service prints its wall-clock times in.
pub const REFERENCE_TZ: Tz = chrono_tz::Europe::Paris;

/// Errors resolving a wall-clock stamp to an instant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstantError {
    /// The stamp did not parse as `DD/MM/YY HH:MM`.
    #[error("unparseable wall-clock stamp {stamp:?}")]
    Unparseable { stamp: String },
    /// The local time falls in a spring-forward gap and never occurred.
    #[error("wall-clock time {naive} does not exist in the reference timezone")]
    Nonexistent { naive: NaiveDateTime },
}

/// Parses a `DD/MM/YY` date and `HH:MM` time into a UTC instant.
///
/// Two-digit years are interpreted as 20xx by `%y`.
pub fn parse_wall_clock(date: &str, time: &str) -> Result<DateTime<Utc>, InstantError> {
    let stamp = format!("{date} {time}");
    let naive = NaiveDateTime::parse_from_str(&stamp, "%d/%m/%y %H:%M")
        .map_err(|_| InstantError::Unparseable { stamp })?;
    to_instant(naive)
}

/// Resolves a naive wall-clock time in the reference timezone to a UTC
/// instant.
///
/// Times that occur twice during the autumn fold resolve to the earlier
/// instant; times skipped by the spring-forward gap are an error.
pub fn to_instant(naive: NaiveDateTime) -> Result<DateTime<Utc>, InstantError> {
    match REFERENCE_TZ.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earlier, _) => Ok(earlier.with_timezone(&Utc)),
        LocalResult::None => Err(InstantError::Nonexistent { naive }),
    }
}

//! Core types: records, instants, email decoding, field extraction

pub mod extract;
pub mod mail;
pub mod record;
pub mod time;
pub mod tracing;

pub use extract::{ExtractError, Extraction, extract};
pub use mail::{DecodeError, DecodedMessage, decode};
pub use record::{CancellationRecord, ReservationRecord};
pub use time::{InstantError, parse_wall_clock, to_instant};
pub use tracing::{TracingConfig, TracingError, init_tracing};

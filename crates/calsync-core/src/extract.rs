//! Field extraction from decoded notification bodies.
//!
//! The service's emails are semi-structured human-readable text, so each
//! field is matched by its own independent pattern rather than one
//! monolithic grammar; minor body reformatting breaks one field, not the
//! whole parse. Classification is driven by the subject line alone.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::record::{CancellationRecord, ReservationRecord};
use crate::time::{self, InstantError};

/// Subject marker of a creation notification ("trip of <person>").
const RESERVATION_MARKER: &str = "Le voyage de";
/// Subject marker of a cancellation notification.
const CANCELLATION_MARKER: &str = "a annulé son voyage";

static TRIP_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Début : (\d{2}/\d{2}/\d{2}) (\d{2}:\d{2})").expect("invalid trip start pattern")
});

static TRIP_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Fin du voyage : (\d{2}/\d{2}/\d{2}) (\d{2}:\d{2})")
        .expect("invalid trip end pattern")
});

/// Non-greedy so the capture stops at the first delimiter phrase; renter
/// names cannot themselves contain it.
static RENTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Le voyage de (.+?) dans votre").expect("invalid renter pattern"));

static VEHICLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"dans votre (.*?) est réservé").expect("invalid vehicle pattern")
});

static CANCELLING_RENTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(.+?) a annulé son voyage").expect("invalid cancelling renter pattern")
});

/// Errors extracting a record from a classified message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// A creation email was missing one of its four required fields.
    #[error("reservation email is missing the {missing} field")]
    IncompleteReservation { missing: &'static str },
    /// A cancellation email was missing one of its two required fields.
    #[error("cancellation email is missing the {missing} field")]
    IncompleteCancellation { missing: &'static str },
    /// A matched wall-clock stamp did not resolve to an instant.
    #[error(transparent)]
    Instant(#[from] InstantError),
}

/// Result of classifying and extracting one decoded message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The message is a creation request.
    Reservation(ReservationRecord),
    /// The message is a cancellation request.
    Cancellation(CancellationRecord),
    /// The subject matched no known pattern; not an error.
    NoMatch,
}

/// Classifies the message by subject and extracts the matching record.
///
/// Classification is evaluated in order: the reservation marker wins over
/// the cancellation marker when a subject somehow contains both.
pub fn extract(subject: &str, body: &str) -> Result<Extraction, ExtractError> {
    if subject.contains(RESERVATION_MARKER) {
        extract_reservation(body).map(Extraction::Reservation)
    } else if subject.contains(CANCELLATION_MARKER) {
        extract_cancellation(body).map(Extraction::Cancellation)
    } else {
        Ok(Extraction::NoMatch)
    }
}

fn extract_reservation(body: &str) -> Result<ReservationRecord, ExtractError> {
    let start = TRIP_START
        .captures(body)
        .ok_or(ExtractError::IncompleteReservation { missing: "trip start" })?;
    let end = TRIP_END
        .captures(body)
        .ok_or(ExtractError::IncompleteReservation { missing: "trip end" })?;
    let renter = RENTER
        .captures(body)
        .ok_or(ExtractError::IncompleteReservation { missing: "renter name" })?;
    let vehicle = VEHICLE
        .captures(body)
        .ok_or(ExtractError::IncompleteReservation { missing: "vehicle name" })?;

    Ok(ReservationRecord {
        renter: renter[1].to_string(),
        vehicle: vehicle[1].to_string(),
        start: time::parse_wall_clock(&start[1], &start[2])?,
        end: time::parse_wall_clock(&end[1], &end[2])?,
    })
}

fn extract_cancellation(body: &str) -> Result<CancellationRecord, ExtractError> {
    let start = TRIP_START
        .captures(body)
        .ok_or(ExtractError::IncompleteCancellation { missing: "trip start" })?;
    let renter = CANCELLING_RENTER
        .captures(body)
        .ok_or(ExtractError::IncompleteCancellation { missing: "renter name" })?;

    Ok(CancellationRecord {
        renter: renter[1].to_string(),
        start: time::parse_wall_clock(&start[1], &start[2])?,
    })
}

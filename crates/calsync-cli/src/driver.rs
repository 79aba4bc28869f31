//! Reconciliation driver: decode, extract, dispatch to the store.
//!
//! The driver is the only component that touches all the others and has no
//! state of its own. Message-local failures (unparseable message, missing
//! fields, unrecognized subject, ambiguous cancellation) come back as
//! [`Outcome::Rejected`]; only calendar-document I/O failures propagate as
//! errors, because silently losing a reservation is unacceptable.

use std::fmt;
use std::path::Path;

use tracing::{info, warn};

use calsync_core::{DecodeError, Extraction, decode, extract};
use calsync_store::{CalendarStore, CancelOutcome, StoreError};

/// Why a message was rejected without touching the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Headers or body could not be parsed at all.
    MalformedMessage,
    /// The subject matched no known reservation or cancellation pattern.
    UnrecognizedSubject,
    /// A classified message was missing required fields.
    IncompleteFields(String),
    /// More than one stored event matched the cancellation.
    AmbiguousCancellation(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedMessage => write!(f, "message could not be parsed"),
            Self::UnrecognizedSubject => write!(f, "subject matched no known pattern"),
            Self::IncompleteFields(detail) => write!(f, "{}", detail),
            Self::AmbiguousCancellation(detail) => write!(f, "{}", detail),
        }
    }
}

/// Terminal outcome of handling one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A reservation event was added to the calendar.
    Created,
    /// The matching event was removed from the calendar.
    Cancelled,
    /// A valid cancellation matched no stored event.
    NotFound,
    /// The message was set aside without touching the calendar.
    Rejected(RejectReason),
}

/// Handles one raw message against the calendar directory.
pub fn handle(raw: &[u8], directory: &Path) -> Result<Outcome, StoreError> {
    let message = match decode(raw) {
        Ok(message) => message,
        Err(DecodeError::Malformed) => {
            warn!("Message could not be parsed; rejecting");
            return Ok(Outcome::Rejected(RejectReason::MalformedMessage));
        }
    };

    let extraction = match extract(&message.subject, &message.body) {
        Ok(extraction) => extraction,
        Err(err) => {
            warn!(
                subject = %message.subject,
                error = %err,
                "Message did not contain all required details"
            );
            return Ok(Outcome::Rejected(RejectReason::IncompleteFields(
                err.to_string(),
            )));
        }
    };

    let store = CalendarStore::new(directory);
    match extraction {
        Extraction::Reservation(record) => {
            store.add_event(&record)?;
            info!(
                subject = %message.subject,
                renter = %record.renter,
                start = %record.start,
                end = %record.end,
                "Processed reservation"
            );
            Ok(Outcome::Created)
        }
        Extraction::Cancellation(record) => match store.cancel_event(&record) {
            Ok(CancelOutcome::Removed) => {
                info!(
                    subject = %message.subject,
                    renter = %record.renter,
                    start = %record.start,
                    "Cancelled reservation"
                );
                Ok(Outcome::Cancelled)
            }
            Ok(CancelOutcome::NotFound) => {
                warn!(
                    subject = %message.subject,
                    renter = %record.renter,
                    start = %record.start,
                    "No matching event found to cancel"
                );
                Ok(Outcome::NotFound)
            }
            Err(err @ StoreError::AmbiguousMatch { .. }) => {
                warn!(subject = %message.subject, error = %err, "Refusing ambiguous cancellation");
                Ok(Outcome::Rejected(RejectReason::AmbiguousCancellation(
                    err.to_string(),
                )))
            }
            Err(err) => Err(err),
        },
        Extraction::NoMatch => {
            warn!(
                subject = %message.subject,
                "Subject did not match known patterns for reservation or cancellation"
            );
            Ok(Outcome::Rejected(RejectReason::UnrecognizedSubject))
        }
    }
}

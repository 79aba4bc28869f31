//! Records extracted from reservation notification emails.
//!
//! A creation email yields a [`ReservationRecord`], a cancellation email a
//! [`CancellationRecord`]. Both carry instants normalized to UTC: the store
//! compares instants, never wall-clock strings, so records must never hold a
//! local time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reservation parsed from a creation notification.
///
/// Produced only when the renter, the vehicle, and both trip instants were
/// all present in the decoded body. A partially extracted reservation is an
/// error, never a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRecord {
    /// Display name of the renter, as printed in the email body.
    pub renter: String,
    /// Display name of the reserved vehicle.
    pub vehicle: String,
    /// Trip start instant.
    pub start: DateTime<Utc>,
    /// Trip end instant.
    pub end: DateTime<Utc>,
}

impl ReservationRecord {
    /// The calendar summary line for this reservation.
    pub fn summary(&self) -> String {
        format!("{} by {}", self.vehicle, self.renter)
    }
}

/// A cancellation parsed from a cancellation notification.
///
/// Carries no end instant or vehicle name; stored events are matched on the
/// renter name and the exact start instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationRecord {
    /// Display name of the renter, as printed in the email body.
    pub renter: String,
    /// Trip start instant.
    pub start: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn summary_format() {
        let record = ReservationRecord {
            renter: "Alice".to_string(),
            vehicle: "Renault Clio".to_string(),
            start: utc(2024, 6, 1, 8, 0),
            end: utc(2024, 6, 1, 16, 0),
        };
        assert_eq!(record.summary(), "Renault Clio by Alice");
    }

    #[test]
    fn reservation_serde_roundtrip() {
        let record = ReservationRecord {
            renter: "Alice".to_string(),
            vehicle: "Renault Clio".to_string(),
            start: utc(2024, 6, 1, 8, 0),
            end: utc(2024, 6, 1, 16, 0),
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: ReservationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
    }

    #[test]
    fn cancellation_serde_roundtrip() {
        let record = CancellationRecord {
            renter: "Alice".to_string(),
            start: utc(2024, 6, 1, 8, 0),
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: CancellationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
    }
}

//! In-memory calendar document model and its iCalendar mapping.
//!
//! The document is the sole persisted state of the system: an ordered list
//! of events, parsed from and serialized to RFC 5545 data. Parsing goes
//! through the `icalendar` crate and normalizes every event time to a UTC
//! instant, because cancellation matching compares instants, never local
//! wall-clock strings.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{
    Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, Event, EventLike,
};
use tracing::debug;
use uuid::Uuid;

use calsync_core::{CancellationRecord, ReservationRecord};

/// A single VEVENT held in the calendar document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEvent {
    /// Unique identifier; generated for events written by older tooling
    /// that carried none.
    pub uid: String,
    /// Event summary, `"<vehicle> by <renter>"` for events created here.
    pub summary: String,
    /// Start instant.
    pub start: DateTime<Utc>,
    /// End instant.
    pub end: DateTime<Utc>,
    /// Creation stamp (DTSTAMP), when present in the source data.
    pub stamp: Option<DateTime<Utc>>,
}

/// The ordered set of events backed by one `reservation.ics` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarDocument {
    /// Events in stored order.
    pub events: Vec<StoredEvent>,
}

impl CalendarDocument {
    /// Parses iCalendar data into a document.
    ///
    /// Components other than VEVENT are dropped, as are events without a
    /// start time.
    pub fn parse(ics: &str) -> Result<Self, String> {
        let calendar: Calendar = ics.parse().map_err(|e: String| e.to_string())?;
        let events = calendar
            .iter()
            .filter_map(|component| match component {
                CalendarComponent::Event(event) => parse_event(&event),
                _ => None,
            })
            .collect();
        Ok(Self { events })
    }

    /// Serializes the document back to iCalendar data.
    pub fn to_ics(&self) -> String {
        let mut calendar = Calendar::new();
        for event in &self.events {
            let mut vevent = Event::new();
            vevent
                .uid(&event.uid)
                .summary(&event.summary)
                .starts(event.start)
                .ends(event.end);
            if let Some(stamp) = event.stamp {
                vevent.timestamp(stamp);
            }
            calendar.push(vevent.done());
        }
        calendar.to_string()
    }

    /// Appends a new event for the reservation.
    ///
    /// Never deduplicates: the upstream service sends one email per
    /// reservation, and repeated deliveries stay visible in the calendar
    /// rather than being silently merged.
    pub fn push_reservation(&mut self, record: &ReservationRecord, stamp: DateTime<Utc>) {
        self.events.push(StoredEvent {
            uid: Uuid::new_v4().to_string(),
            summary: record.summary(),
            start: record.start,
            end: record.end,
            stamp: Some(stamp),
        });
    }

    /// Indices of events matching a cancellation, in stored order.
    ///
    /// Identity is (renter name substring of summary, exact start instant):
    /// the upstream emails carry no reservation identifier to match on.
    pub fn matching_events(&self, record: &CancellationRecord) -> Vec<usize> {
        self.events
            .iter()
            .enumerate()
            .filter(|(_, event)| {
                event.summary.contains(&record.renter) && event.start == record.start
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Removes and returns the event at `index`.
    pub fn remove_event(&mut self, index: usize) -> StoredEvent {
        self.events.remove(index)
    }
}

/// Parses a single VEVENT component into a StoredEvent.
fn parse_event(event: &Event) -> Option<StoredEvent> {
    let start = instant_of(event.get_start()?)?;
    let end = instant_of(event.get_end().or_else(|| event.get_start())?)?;
    let uid = event
        .get_uid()
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let summary = event.get_summary().unwrap_or_default().to_string();

    debug!(uid = %uid, summary = %summary, start = %start, "Parsed stored event");

    Some(StoredEvent {
        uid,
        summary,
        start,
        end,
        stamp: event.get_timestamp(),
    })
}

/// Converts an icalendar date-or-datetime to a UTC instant.
///
/// Date-only values map to midnight UTC. Zoned values resolve through their
/// IANA identifier; an unknown identifier drops the event rather than
/// guessing an offset.
fn instant_of(dt: DatePerhapsTime) -> Option<DateTime<Utc>> {
    match dt {
        DatePerhapsTime::Date(date) => Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?)),
        DatePerhapsTime::DateTime(cdt) => match cdt {
            CalendarDateTime::Utc(dt) => Some(dt),
            CalendarDateTime::Floating(naive) => Some(Utc.from_utc_datetime(&naive)),
            CalendarDateTime::WithTimezone { date_time, tzid } => {
                let tz: Tz = tzid.parse().ok()?;
                tz.from_local_datetime(&date_time)
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc))
            }
        },
    }
}

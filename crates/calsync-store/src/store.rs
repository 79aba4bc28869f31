//! Load-mutate-persist operations over a calendar directory.
//!
//! Every operation is a full cycle on the single `reservation.ics` file:
//! take the directory lock, load the document (or start empty), mutate,
//! write to a sibling temp file, rename over the target. There is no other
//! persisted state.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use calsync_core::{CancellationRecord, ReservationRecord};

use crate::document::CalendarDocument;
use crate::error::{StoreError, StoreResult};
use crate::lock::DirLock;

/// File name of the calendar document inside the store directory.
pub const DOCUMENT_FILE: &str = "reservation.ics";

/// Outcome of a cancellation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The matching event was removed and the document rewritten.
    Removed,
    /// No stored event matched; the document was left untouched.
    NotFound,
}

/// Calendar store rooted at one output directory.
#[derive(Debug, Clone)]
pub struct CalendarStore {
    directory: PathBuf,
}

impl CalendarStore {
    /// Creates a store for the given directory. The directory must already
    /// exist; the document is created on the first reservation.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Path of the calendar document.
    pub fn document_path(&self) -> PathBuf {
        self.directory.join(DOCUMENT_FILE)
    }

    /// Appends a reservation event to the document, creating the document
    /// if this is the directory's first reservation.
    pub fn add_event(&self, record: &ReservationRecord) -> StoreResult<()> {
        let _lock = DirLock::acquire(&self.directory)?;
        let mut document = self.load()?;
        document.push_reservation(record, Utc::now());
        self.persist(&document)?;
        info!(
            path = %self.document_path().display(),
            summary = %record.summary(),
            start = %record.start,
            end = %record.end,
            "Calendar document updated"
        );
        Ok(())
    }

    /// Removes the event matching the cancellation.
    ///
    /// Returns [`CancelOutcome::NotFound`] without creating any file when
    /// the document does not exist. When more than one stored event matches
    /// the (renter, start instant) pair the ambiguity is surfaced as
    /// [`StoreError::AmbiguousMatch`] and nothing is removed.
    pub fn cancel_event(&self, record: &CancellationRecord) -> StoreResult<CancelOutcome> {
        if !self.document_path().exists() {
            warn!(
                path = %self.document_path().display(),
                "Calendar document not found; no event to cancel"
            );
            return Ok(CancelOutcome::NotFound);
        }

        let _lock = DirLock::acquire(&self.directory)?;
        let mut document = self.load()?;
        let matches = document.matching_events(record);
        match matches.as_slice() {
            [] => {
                warn!(
                    renter = %record.renter,
                    start = %record.start,
                    "No matching event found to cancel"
                );
                Ok(CancelOutcome::NotFound)
            }
            [index] => {
                let removed = document.remove_event(*index);
                self.persist(&document)?;
                info!(
                    path = %self.document_path().display(),
                    summary = %removed.summary,
                    start = %removed.start,
                    "Event cancelled"
                );
                Ok(CancelOutcome::Removed)
            }
            ambiguous => Err(StoreError::AmbiguousMatch {
                renter: record.renter.clone(),
                start: record.start,
                count: ambiguous.len(),
            }),
        }
    }

    fn load(&self) -> StoreResult<CalendarDocument> {
        let path = self.document_path();
        if !path.exists() {
            return Ok(CalendarDocument::default());
        }
        let raw = fs::read_to_string(&path)?;
        CalendarDocument::parse(&raw).map_err(|reason| StoreError::Parse { path, reason })
    }

    /// Writes the document to a sibling temp file and renames it over the
    /// target, so readers never observe a partially written document.
    fn persist(&self, document: &CalendarDocument) -> StoreResult<()> {
        let mut tmp = NamedTempFile::new_in(&self.directory)?;
        tmp.write_all(document.to_ics().as_bytes())?;
        tmp.persist(self.document_path())
            .map_err(|err| StoreError::Io(err.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};
    use tempfile::tempdir;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn reservation(renter: &str, vehicle: &str) -> ReservationRecord {
        ReservationRecord {
            renter: renter.to_string(),
            vehicle: vehicle.to_string(),
            start: utc(2024, 6, 1, 8, 0),
            end: utc(2024, 6, 1, 16, 0),
        }
    }

    fn cancellation(renter: &str) -> CancellationRecord {
        CancellationRecord {
            renter: renter.to_string(),
            start: utc(2024, 6, 1, 8, 0),
        }
    }

    fn stored_events(store: &CalendarStore) -> Vec<String> {
        let raw = fs::read_to_string(store.document_path()).unwrap();
        CalendarDocument::parse(&raw)
            .unwrap()
            .events
            .into_iter()
            .map(|event| event.summary)
            .collect()
    }

    #[test]
    fn add_creates_document_with_one_event() {
        let dir = tempdir().unwrap();
        let store = CalendarStore::new(dir.path());

        store.add_event(&reservation("Alice", "Renault Clio")).unwrap();

        assert_eq!(stored_events(&store), vec!["Renault Clio by Alice"]);
    }

    #[test]
    fn add_twice_yields_two_events() {
        let dir = tempdir().unwrap();
        let store = CalendarStore::new(dir.path());
        let record = reservation("Alice", "Renault Clio");

        store.add_event(&record).unwrap();
        store.add_event(&record).unwrap();

        assert_eq!(stored_events(&store).len(), 2);
    }

    #[test]
    fn add_fails_on_missing_directory() {
        let dir = tempdir().unwrap();
        let store = CalendarStore::new(dir.path().join("nope"));
        let result = store.add_event(&reservation("Alice", "Renault Clio"));
        assert!(matches!(result, Err(StoreError::Io(_))));
    }

    #[test]
    fn cancel_removes_the_matching_event() {
        let dir = tempdir().unwrap();
        let store = CalendarStore::new(dir.path());
        store.add_event(&reservation("Alice", "Renault Clio")).unwrap();
        store.add_event(&reservation("Bob", "Peugeot 208")).unwrap();

        let outcome = store.cancel_event(&cancellation("Alice")).unwrap();

        assert_eq!(outcome, CancelOutcome::Removed);
        assert_eq!(stored_events(&store), vec!["Peugeot 208 by Bob"]);
    }

    #[test]
    fn cancel_without_match_leaves_document_unchanged() {
        let dir = tempdir().unwrap();
        let store = CalendarStore::new(dir.path());
        store.add_event(&reservation("Alice", "Renault Clio")).unwrap();
        let before = fs::read_to_string(store.document_path()).unwrap();

        let outcome = store.cancel_event(&cancellation("Carol")).unwrap();

        assert_eq!(outcome, CancelOutcome::NotFound);
        let after = fs::read_to_string(store.document_path()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn cancel_on_missing_document_creates_nothing() {
        let dir = tempdir().unwrap();
        let store = CalendarStore::new(dir.path());

        let outcome = store.cancel_event(&cancellation("Alice")).unwrap();

        assert_eq!(outcome, CancelOutcome::NotFound);
        assert!(!store.document_path().exists());
    }

    #[test]
    fn ambiguous_cancellation_removes_nothing() {
        let dir = tempdir().unwrap();
        let store = CalendarStore::new(dir.path());
        // Same start instant, and "Alice" is a substring of both summaries.
        store.add_event(&reservation("Alice", "Renault Clio")).unwrap();
        store.add_event(&reservation("Alice Smith", "Peugeot 208")).unwrap();

        let result = store.cancel_event(&cancellation("Alice"));

        assert!(matches!(
            result,
            Err(StoreError::AmbiguousMatch { count: 2, .. })
        ));
        assert_eq!(stored_events(&store).len(), 2);
    }

    #[test]
    fn unambiguous_name_still_cancels_among_same_start_events() {
        let dir = tempdir().unwrap();
        let store = CalendarStore::new(dir.path());
        store.add_event(&reservation("Alice", "Renault Clio")).unwrap();
        store.add_event(&reservation("Bob", "Peugeot 208")).unwrap();

        let outcome = store.cancel_event(&cancellation("Bob")).unwrap();

        assert_eq!(outcome, CancelOutcome::Removed);
        assert_eq!(stored_events(&store), vec!["Renault Clio by Alice"]);
    }

    #[test]
    fn corrupt_document_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let store = CalendarStore::new(dir.path());
        fs::write(store.document_path(), "not a calendar").unwrap();

        let result = store.add_event(&reservation("Alice", "Renault Clio"));

        assert!(matches!(result, Err(StoreError::Parse { .. })));
        // The corrupt file is left for the operator to inspect.
        assert_eq!(
            fs::read_to_string(store.document_path()).unwrap(),
            "not a calendar"
        );
    }

    #[test]
    fn document_survives_reload_across_operations() {
        let dir = tempdir().unwrap();
        let store = CalendarStore::new(dir.path());
        store.add_event(&reservation("Alice", "Renault Clio")).unwrap();

        // A fresh store over the same directory sees the same events.
        let reopened = CalendarStore::new(dir.path());
        reopened.add_event(&reservation("Bob", "Peugeot 208")).unwrap();

        assert_eq!(
            stored_events(&reopened),
            vec!["Renault Clio by Alice", "Peugeot 208 by Bob"]
        );
    }
}

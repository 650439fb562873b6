//! Collaborator traits consumed by the session generator.
//!
//! The storage backend and the calendar are injected so the pipeline stays
//! pure between one load and one persist per shot.

use chrono::NaiveDate;

use crate::error::StoreError;
use crate::model::{HistoryEntry, PredictedGrades};

// ---------------------------------------------------------------------------
// History store
// ---------------------------------------------------------------------------

/// External store holding the learner's history and predicted grades.
///
/// The generator assumes exclusive access for the duration of a run and
/// performs no locking of its own.
pub trait HistoryStore: Send + Sync {
    /// Load every stored history entry, oldest first.
    fn load_history(&self) -> Result<Vec<HistoryEntry>, StoreError>;

    /// Load the predicted grade per subject.
    fn load_predicted_grades(&self) -> Result<PredictedGrades, StoreError>;

    /// Append `entries` after the stored history.
    fn append_history(&self, entries: &[HistoryEntry]) -> Result<(), StoreError>;

    /// Replace the stored history with `entries`.
    fn replace_history(&self, entries: &[HistoryEntry]) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of "today" for recency weighting and synthetic entry dates.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

//! In-memory history store for tests, dry runs, and embedding.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::error::StoreError;
use crate::model::{HistoryEntry, PredictedGrades};
use crate::traits::HistoryStore;

/// A [`HistoryStore`] backed by process memory.
///
/// Can be told to fail appends after a number of successful ones, which is
/// how partial multi-shot runs are exercised.
pub struct InMemoryStore {
    history: Mutex<Vec<HistoryEntry>>,
    predicted: PredictedGrades,
    append_calls: AtomicU32,
    fail_appends_after: Option<u32>,
}

impl InMemoryStore {
    pub fn new(history: Vec<HistoryEntry>, predicted: PredictedGrades) -> Self {
        Self {
            history: Mutex::new(history),
            predicted,
            append_calls: AtomicU32::new(0),
            fail_appends_after: None,
        }
    }

    /// Make every append after the first `successful` ones fail.
    pub fn failing_appends_after(mut self, successful: u32) -> Self {
        self.fail_appends_after = Some(successful);
        self
    }

    /// Snapshot of the stored history.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.lock().clone()
    }

    /// Number of append calls received, failed ones included.
    pub fn append_calls(&self) -> u32 {
        self.append_calls.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<HistoryEntry>> {
        // A poisoned lock still holds a consistent Vec.
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn unavailable() -> StoreError {
        StoreError::Io {
            path: "memory".into(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "store unavailable"),
        }
    }
}

impl HistoryStore for InMemoryStore {
    fn load_history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(self.history())
    }

    fn load_predicted_grades(&self) -> Result<PredictedGrades, StoreError> {
        Ok(self.predicted.clone())
    }

    fn append_history(&self, entries: &[HistoryEntry]) -> Result<(), StoreError> {
        let call = self.append_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_appends_after.is_some_and(|limit| call >= limit) {
            return Err(Self::unavailable());
        }
        self.lock().extend_from_slice(entries);
        Ok(())
    }

    fn replace_history(&self, entries: &[HistoryEntry]) -> Result<(), StoreError> {
        *self.lock() = entries.to_vec();
        Ok(())
    }
}

//! Removal of generator-created entries from a history.

use crate::model::HistoryEntry;

/// Return `history` without any `Revision` or `Not Studied` entries.
///
/// Real assessments keep their original order and values.
pub fn reset_history(history: &[HistoryEntry]) -> Vec<HistoryEntry> {
    history
        .iter()
        .filter(|entry| !entry.is_synthetic())
        .cloned()
        .collect()
}

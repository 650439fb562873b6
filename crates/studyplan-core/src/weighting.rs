//! Assessment and recency weighting of raw history entries.

use chrono::NaiveDate;

use crate::config::{RecencyConfig, RecommenderConfig};
use crate::error::Result;
use crate::model::{HistoryEntry, PredictedGrades};

/// One history entry after weighting.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedEntry {
    pub subject: String,
    pub weighted_score: f64,
    /// Type weight of the source entry, kept even when the score fell back.
    pub original_weight: f64,
    /// Set when the entry had no positive score and no predicted grade.
    pub no_data: bool,
}

/// Decay multiplier for an entry dated `entry_date`, measured against `today`.
///
/// Linear from `max_weight` at age 0 down to `min_weight` at
/// `zero_day_threshold` days; entries dated in the future count as age 0.
pub fn recency_factor(entry_date: NaiveDate, today: NaiveDate, recency: &RecencyConfig) -> f64 {
    let age_days = (today - entry_date).num_days();
    let window = i64::from(recency.zero_day_threshold.max(1));
    let (min, max) = (recency.min_weight, recency.max_weight);

    if age_days >= window {
        return min;
    }
    if age_days <= 0 {
        return max;
    }

    let scaled = max - (max - min) * (age_days as f64 / window as f64);
    scaled.clamp(min, max)
}

/// Weight every entry of `history`.
///
/// Positive scores become `score × type_weight × recency`. Non-positive
/// scores take the subject's predicted grade verbatim, or zero flagged as
/// `no_data` when there is none. Fails on the first entry whose type has no
/// configured weight.
pub fn apply_weighting(
    history: &[HistoryEntry],
    predicted: &PredictedGrades,
    config: &RecommenderConfig,
    today: NaiveDate,
) -> Result<Vec<WeightedEntry>> {
    history
        .iter()
        .map(|entry| weigh_entry(entry, predicted, config, today))
        .collect()
}

fn weigh_entry(
    entry: &HistoryEntry,
    predicted: &PredictedGrades,
    config: &RecommenderConfig,
    today: NaiveDate,
) -> Result<WeightedEntry> {
    let type_weight = config.weights.weight(entry.kind)?;

    let (weighted_score, no_data) = if entry.score > 0.0 {
        let recency = recency_factor(entry.date, today, &config.recency);
        (entry.score * type_weight * recency, false)
    } else {
        match predicted.get(&entry.subject) {
            Some(grade) => (grade, false),
            None => (0.0, true),
        }
    };

    Ok(WeightedEntry {
        subject: entry.subject.clone(),
        weighted_score,
        original_weight: type_weight,
        no_data,
    })
}

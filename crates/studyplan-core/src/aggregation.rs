//! Per-subject aggregation of weighted entries.

use std::collections::HashMap;

use crate::error::{RecommenderError, Result};
use crate::model::PredictedGrades;
use crate::weighting::WeightedEntry;

/// Decimal places aggregate scores are floored to.
pub const AGGREGATE_PRECISION: u32 = 2;

// Absorbs binary representation error so values already on the grid stay put.
const FLOOR_TOLERANCE: f64 = 1e-9;

/// One subject's representative score before normalisation.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectAggregate {
    pub subject: String,
    pub aggregate_score: f64,
}

/// Floor `value` to `decimals` places.
pub fn floor_to_precision(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale + FLOOR_TOLERANCE).floor() / scale
}

/// Aggregate weighted entries into one score per subject.
///
/// Subjects come out in a fixed order: predicted-grade subjects
/// alphabetically, then history-only subjects by first appearance. A subject
/// with usable weighted entries gets their floored mean; otherwise its
/// predicted grade; otherwise the call fails with `MissingData`.
pub fn aggregate_scores(
    weighted: &[WeightedEntry],
    predicted: &PredictedGrades,
) -> Result<Vec<SubjectAggregate>> {
    let mut order: Vec<&str> = predicted.subjects().collect();
    let mut totals: HashMap<&str, (f64, u32)> = HashMap::new();

    for entry in weighted {
        let subject = entry.subject.as_str();
        if !predicted.contains(subject) && !totals.contains_key(subject) {
            order.push(subject);
        }
        let slot = totals.entry(subject).or_insert((0.0, 0));
        if !entry.no_data {
            slot.0 += entry.weighted_score;
            slot.1 += 1;
        }
    }

    order
        .into_iter()
        .map(|subject| -> Result<SubjectAggregate> {
            let aggregate_score = match totals.get(subject) {
                Some(&(sum, count)) if count > 0 => {
                    floor_to_precision(sum / f64::from(count), AGGREGATE_PRECISION)
                }
                _ => predicted
                    .get(subject)
                    .ok_or_else(|| RecommenderError::MissingData(subject.to_string()))?,
            };
            Ok(SubjectAggregate {
                subject: subject.to_string(),
                aggregate_score,
            })
        })
        .collect()
}

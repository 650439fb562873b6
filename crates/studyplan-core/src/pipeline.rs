//! One Weighting → Aggregation → Normalisation pass.

use chrono::NaiveDate;

use crate::aggregation::{aggregate_scores, SubjectAggregate};
use crate::config::RecommenderConfig;
use crate::error::Result;
use crate::model::{HistoryEntry, PredictedGrades};
use crate::normalisation::{choose_lowest_subject, NormalisedDistribution};
use crate::weighting::apply_weighting;

/// Result of a full pipeline pass.
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub aggregates: Vec<SubjectAggregate>,
    pub distribution: NormalisedDistribution,
    /// The lowest-scoring subject.
    pub subject: String,
}

/// Weight and aggregate `history`, stopping before normalisation.
pub fn calculate_aggregates(
    history: &[HistoryEntry],
    predicted: &PredictedGrades,
    config: &RecommenderConfig,
    today: NaiveDate,
) -> Result<Vec<SubjectAggregate>> {
    let weighted = apply_weighting(history, predicted, config, today)?;
    aggregate_scores(&weighted, predicted)
}

/// Run every stage and pick the next subject to study.
pub fn recommend_subject(
    history: &[HistoryEntry],
    predicted: &PredictedGrades,
    config: &RecommenderConfig,
    today: NaiveDate,
) -> Result<Recommendation> {
    let aggregates = calculate_aggregates(history, predicted, config, today)?;
    let (distribution, subject) = choose_lowest_subject(&aggregates)?;
    Ok(Recommendation {
        aggregates,
        distribution,
        subject,
    })
}

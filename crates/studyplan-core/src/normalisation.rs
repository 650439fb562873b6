//! Normalisation of aggregate scores and selection of the next subject.

use crate::aggregation::SubjectAggregate;
use crate::error::{RecommenderError, Result};

/// Subject scores rescaled to sum to one, in aggregation order.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalisedDistribution {
    scores: Vec<(String, f64)>,
}

impl NormalisedDistribution {
    pub fn get(&self, subject: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|(s, _)| s == subject)
            .map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(s, score)| (s.as_str(), *score))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// The lowest-scoring subject.
    ///
    /// Ties go to the subject that comes first in iteration order, which
    /// keeps recommendations deterministic for identical inputs.
    pub fn lowest(&self) -> Option<&str> {
        let mut lowest: Option<(&str, f64)> = None;
        for (subject, score) in self.iter() {
            match lowest {
                Some((_, best)) if score >= best => {}
                _ => lowest = Some((subject, score)),
            }
        }
        lowest.map(|(subject, _)| subject)
    }
}

/// Rescale aggregates so they sum to one while keeping their ratios.
///
/// An empty input or a zero total is a `DegenerateDistribution` error.
pub fn normalise_scores(aggregates: &[SubjectAggregate]) -> Result<NormalisedDistribution> {
    let total: f64 = aggregates.iter().map(|a| a.aggregate_score).sum();
    if aggregates.is_empty() || total <= 0.0 {
        return Err(RecommenderError::DegenerateDistribution {
            subjects: aggregates.len(),
        });
    }

    let scores = aggregates
        .iter()
        .map(|a| (a.subject.clone(), a.aggregate_score / total))
        .collect();
    Ok(NormalisedDistribution { scores })
}

/// Normalise and pick the lowest-scoring subject in one step.
pub fn choose_lowest_subject(
    aggregates: &[SubjectAggregate],
) -> Result<(NormalisedDistribution, String)> {
    let distribution = normalise_scores(aggregates)?;
    let subject = distribution
        .lowest()
        .map(str::to_string)
        .ok_or(RecommenderError::DegenerateDistribution { subjects: 0 })?;
    Ok((distribution, subject))
}

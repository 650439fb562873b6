//! Summary statistics over generated plans.
//!
//! Subjects of every plan are concatenated in shot order and treated as one
//! sequence, so a streak can span the boundary between two shots.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::SessionPlan;

/// Statistics for a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Sessions per subject.
    pub frequency: BTreeMap<String, usize>,
    /// Number of distinct subjects scheduled.
    pub unique_subjects: usize,
    /// Subject of the longest same-subject streak (the first one on ties).
    pub longest_streak_subject: Option<String>,
    pub longest_streak: usize,
    /// 1-based position of the first subject scheduled a second time.
    pub first_repeat_position: Option<usize>,
    /// Sessions that fit before the first repeat.
    pub recommended_session_cap: usize,
    pub total_sessions: usize,
    pub shots: usize,
}

impl RunSummary {
    /// Frequency pairs by descending count, then subject name.
    pub fn frequency_ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<_> = self
            .frequency
            .iter()
            .map(|(subject, count)| (subject.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

/// Compute frequency, streak, and repeat statistics for `plans`.
pub fn analyse_run(plans: &[SessionPlan]) -> RunSummary {
    let subjects: Vec<&str> = plans
        .iter()
        .flat_map(|plan| plan.subjects.iter().map(String::as_str))
        .collect();

    let mut frequency: BTreeMap<String, usize> = BTreeMap::new();
    for subject in &subjects {
        *frequency.entry((*subject).to_string()).or_default() += 1;
    }

    let mut longest_streak_subject = None;
    let mut longest_streak = 0;
    let mut current: Option<&str> = None;
    let mut current_length = 0;
    for subject in &subjects {
        if current == Some(*subject) {
            current_length += 1;
        } else {
            current = Some(*subject);
            current_length = 1;
        }
        if current_length > longest_streak {
            longest_streak = current_length;
            longest_streak_subject = Some((*subject).to_string());
        }
    }

    let mut seen = HashSet::new();
    let first_repeat_position = subjects
        .iter()
        .position(|subject| !seen.insert(*subject))
        .map(|index| index + 1);
    let recommended_session_cap = match first_repeat_position {
        Some(position) => position - 1,
        None => subjects.len(),
    };

    RunSummary {
        unique_subjects: frequency.len(),
        frequency,
        longest_streak_subject,
        longest_streak,
        first_repeat_position,
        recommended_session_cap,
        total_sessions: subjects.len(),
        shots: plans.len(),
    }
}

//! Session generator.
//!
//! Each shot copies the history into a working snapshot and, per session,
//! runs the scoring pipeline, records the lowest-scoring subject, then
//! appends synthetic entries so the next pass sees the session as done:
//! a `Not Studied` penalty that pulls every other subject's mean down by
//! `skip_decay`, and a `Revision` entry that lifts the chosen one clear of
//! the subjects still waiting for their first session of the shot. Shots
//! run in order and each shot's synthetic entries are persisted as soon as
//! it completes.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::aggregation::{aggregate_scores, SubjectAggregate};
use crate::config::{RecommenderConfig, ShotMode};
use crate::error::Result;
use crate::model::{AssessmentType, HistoryEntry, PredictedGrades, Run, SessionPlan};
use crate::normalisation::choose_lowest_subject;
use crate::traits::{Clock, HistoryStore};
use crate::weighting::{apply_weighting, WeightedEntry};

/// Overrides for a single generator invocation. `None` fields fall back to
/// the store (for data) or the configuration (for parameters).
#[derive(Debug, Clone, Default)]
pub struct PlanRequest {
    pub history: Option<Vec<HistoryEntry>>,
    pub predicted_grades: Option<PredictedGrades>,
    pub count: Option<u32>,
    pub session_time: Option<u32>,
    pub break_time: Option<u32>,
    pub shots: Option<u32>,
    pub shot_mode: Option<ShotMode>,
    pub session_date: Option<NaiveDate>,
}

/// Resolved per-shot session parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionParameters {
    pub count: u32,
    pub session_time: u32,
    pub break_time: u32,
}

impl SessionParameters {
    /// Score recorded for a completed session.
    pub fn revision_score(&self) -> f64 {
        1.5 * f64::from(self.study_minutes().max(15))
    }

    fn study_minutes(&self) -> u32 {
        self.session_time.saturating_sub(self.break_time)
    }
}

/// One shot's plan and the working history it ended with.
#[derive(Debug, Clone)]
pub struct ShotOutcome {
    pub plan: SessionPlan,
    pub history: Vec<HistoryEntry>,
}

/// Drives shots against a history store.
pub struct SessionGenerator {
    store: Arc<dyn HistoryStore>,
    clock: Arc<dyn Clock>,
    config: RecommenderConfig,
}

impl SessionGenerator {
    pub fn new(
        store: Arc<dyn HistoryStore>,
        clock: Arc<dyn Clock>,
        config: RecommenderConfig,
    ) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Generate one plan per shot and persist each shot's synthetic entries.
    ///
    /// Shots run sequentially. The first failing shot aborts the run with
    /// its error; shots completed before it stay persisted.
    pub fn generate_session_plan(&self, request: PlanRequest) -> Result<Run> {
        self.config.validate()?;

        let history = match request.history {
            Some(history) => history,
            None => self.store.load_history()?,
        };
        let predicted = match request.predicted_grades {
            Some(grades) => grades,
            None => self.store.load_predicted_grades()?,
        };

        let defaults = &self.config.session;
        let params = SessionParameters {
            count: request.count.unwrap_or(defaults.count),
            session_time: request.session_time.unwrap_or(defaults.session_time),
            break_time: request.break_time.unwrap_or(defaults.break_time),
        };
        let shots = request.shots.unwrap_or(defaults.shots).max(1);
        let shot_mode = request.shot_mode.unwrap_or(defaults.shot_mode);
        let session_date = request
            .session_date
            .unwrap_or_else(|| self.clock.today());
        let run_id = Uuid::new_v4();

        tracing::info!(
            %run_id,
            shots,
            count = params.count,
            ?shot_mode,
            %session_date,
            history_len = history.len(),
            "starting run"
        );

        let mut run_history = history.clone();
        let mut base = history;
        let mut plans = Vec::with_capacity(shots as usize);

        for shot in 1..=shots {
            let outcome = run_shot(&base, &predicted, &self.config, &params, session_date, shot)?;

            if !outcome.plan.new_entries.is_empty() {
                self.store.append_history(&outcome.plan.new_entries)?;
            }
            run_history.extend(outcome.plan.new_entries.iter().cloned());

            tracing::info!(
                %run_id,
                shot,
                subjects = ?outcome.plan.subjects,
                appended = outcome.plan.new_entries.len(),
                "shot persisted"
            );

            if shot_mode == ShotMode::Chained {
                base = outcome.history;
            }
            plans.push(outcome.plan);
        }

        Ok(Run {
            id: run_id,
            session_date,
            plans,
            history: run_history,
        })
    }
}

/// Run one shot over a copy of `base`. Pure: nothing is persisted.
///
/// With `N >= 2` tracked subjects every one of them is recommended within
/// the first `N` sessions, and no subject is recommended twice in a row.
pub fn run_shot(
    base: &[HistoryEntry],
    predicted: &PredictedGrades,
    config: &RecommenderConfig,
    params: &SessionParameters,
    session_date: NaiveDate,
    shot: u32,
) -> Result<ShotOutcome> {
    let mut working = base.to_vec();
    let tracked = tracked_subjects(base, predicted);
    let mut unvisited = tracked.clone();
    let mut subjects = Vec::with_capacity(params.count as usize);
    let mut new_entries = Vec::new();

    for session in 1..=params.count {
        let weighted = apply_weighting(&working, predicted, config, session_date)?;
        let aggregates = aggregate_scores(&weighted, predicted)?;
        let (_, chosen) = choose_lowest_subject(&aggregates)?;
        unvisited.retain(|subject| *subject != chosen);

        let penalties = tracked
            .iter()
            .filter(|subject| **subject != chosen)
            .map(|subject| -> Result<HistoryEntry> {
                let score = skip_penalty(&weighted, &aggregates, config, subject)?;
                Ok(HistoryEntry::new(
                    subject.clone(),
                    AssessmentType::NotStudied,
                    score,
                    session_date,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        working.extend(penalties.iter().cloned());

        let horizon = (params.count - session).min(unvisited.len() as u32);
        let lift = boost_score(
            &working,
            predicted,
            config,
            &chosen,
            &unvisited,
            horizon,
            session_date,
        )?;
        let score = params.revision_score().max(lift);
        let revision = HistoryEntry::new(
            chosen.clone(),
            AssessmentType::Revision,
            score,
            session_date,
        );
        working.push(revision.clone());

        tracing::debug!(shot, session, subject = %chosen, score, lift, "session planned");

        new_entries.extend(penalties);
        new_entries.push(revision);
        subjects.push(chosen);
    }

    Ok(ShotOutcome {
        plan: SessionPlan {
            shot,
            date: session_date,
            subjects,
            session_time: params.session_time,
            break_time: params.break_time,
            new_entries,
        },
        history: working,
    })
}

/// Raw `Not Studied` score for a skipped subject.
///
/// The entry weighs in at `(1 - skip_decay)` of the subject's current mean,
/// so appending it strictly lowers a positive mean. Subjects without usable
/// entries are measured against their aggregate, the predicted grade.
fn skip_penalty(
    weighted: &[WeightedEntry],
    aggregates: &[SubjectAggregate],
    config: &RecommenderConfig,
    subject: &str,
) -> Result<f64> {
    let (sum, count) = usable_totals(weighted, subject);
    let mean = if count > 0 {
        sum / f64::from(count)
    } else {
        aggregates
            .iter()
            .find(|a| a.subject == subject)
            .map_or(0.0, |a| a.aggregate_score)
    };
    let per_point = config.weights.weight(AssessmentType::NotStudied)? * config.recency.max_weight;
    Ok(mean * (1.0 - config.session.skip_decay) / per_point)
}

/// Raw `Revision` score that lifts `chosen` above its competitors.
///
/// While some subjects are still `unvisited` this shot, the target is
/// `boost_margin` above the highest of them, scaled up so it survives
/// `horizon` more skip penalties. Otherwise it is `boost_margin` above every
/// other subject's aggregate.
fn boost_score(
    working: &[HistoryEntry],
    predicted: &PredictedGrades,
    config: &RecommenderConfig,
    chosen: &str,
    unvisited: &[String],
    horizon: u32,
    today: NaiveDate,
) -> Result<f64> {
    let weighted = apply_weighting(working, predicted, config, today)?;
    let aggregates = aggregate_scores(&weighted, predicted)?;
    let session = &config.session;

    let rivals = aggregates.iter().filter(|a| a.subject != chosen);
    let target = if unvisited.is_empty() {
        rivals
            .map(|a| a.aggregate_score)
            .reduce(f64::max)
            .map(|highest| highest + session.boost_margin)
    } else {
        let decay = (1.0 - session.skip_decay).powi(horizon as i32);
        rivals
            .filter(|a| unvisited.contains(&a.subject))
            .map(|a| a.aggregate_score)
            .reduce(f64::max)
            .map(|highest| (highest + session.boost_margin) / decay)
    };
    let Some(target) = target else {
        return Ok(0.0);
    };

    let (sum, count) = usable_totals(&weighted, chosen);
    let needed = target * f64::from(count + 1) - sum;
    // Synthetic entries are dated on the run date, so they carry full recency.
    let per_point = config.weights.weight(AssessmentType::Revision)? * config.recency.max_weight;
    Ok((needed / per_point).max(0.0))
}

/// Unfloored sum and count of `subject`'s entries that count towards its mean.
fn usable_totals(weighted: &[WeightedEntry], subject: &str) -> (f64, u32) {
    weighted
        .iter()
        .filter(|w| w.subject == subject && !w.no_data)
        .fold((0.0, 0u32), |(sum, count), w| (sum + w.weighted_score, count + 1))
}

/// Subjects a shot schedules over: predicted-grade subjects, then
/// history-only subjects by first appearance.
fn tracked_subjects(history: &[HistoryEntry], predicted: &PredictedGrades) -> Vec<String> {
    let mut subjects: Vec<String> = predicted.subjects().map(str::to_string).collect();
    for entry in history {
        if !subjects.contains(&entry.subject) {
            subjects.push(entry.subject.clone());
        }
    }
    subjects
}

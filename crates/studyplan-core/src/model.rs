//! Core data model types for studyplan.
//!
//! History entries are immutable records of assessments (real or synthetic);
//! predicted grades are baseline scores per subject; plans and runs are the
//! outputs of the session generator.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RecommenderError;

/// Kind of assessment a history entry records.
///
/// Variants are declared in ascending order of stakes; `Revision` and
/// `NotStudied` are reserved for entries created by the session generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AssessmentType {
    Revision,
    #[serde(rename = "Not Studied")]
    NotStudied,
    Homework,
    Quiz,
    #[serde(rename = "Topic Test")]
    TopicTest,
    #[serde(rename = "Mock Exam")]
    MockExam,
    Exam,
}

impl AssessmentType {
    /// Every assessment type, in declaration order.
    pub const ALL: [AssessmentType; 7] = [
        AssessmentType::Revision,
        AssessmentType::NotStudied,
        AssessmentType::Homework,
        AssessmentType::Quiz,
        AssessmentType::TopicTest,
        AssessmentType::MockExam,
        AssessmentType::Exam,
    ];

    /// Returns `true` for types only the generator produces.
    pub fn is_synthetic(self) -> bool {
        matches!(self, AssessmentType::Revision | AssessmentType::NotStudied)
    }

    /// The label used in stored history and configuration.
    pub fn label(self) -> &'static str {
        match self {
            AssessmentType::Revision => "Revision",
            AssessmentType::NotStudied => "Not Studied",
            AssessmentType::Homework => "Homework",
            AssessmentType::Quiz => "Quiz",
            AssessmentType::TopicTest => "Topic Test",
            AssessmentType::MockExam => "Mock Exam",
            AssessmentType::Exam => "Exam",
        }
    }
}

impl fmt::Display for AssessmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AssessmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "revision" => Ok(AssessmentType::Revision),
            "not studied" | "not_studied" => Ok(AssessmentType::NotStudied),
            "homework" => Ok(AssessmentType::Homework),
            "quiz" => Ok(AssessmentType::Quiz),
            "topic test" | "topic_test" => Ok(AssessmentType::TopicTest),
            "mock exam" | "mock_exam" => Ok(AssessmentType::MockExam),
            "exam" => Ok(AssessmentType::Exam),
            other => Err(format!("unknown assessment type: {other}")),
        }
    }
}

/// One recorded (or synthesised) assessment result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Subject name, e.g. "Maths".
    pub subject: String,
    /// Assessment type.
    #[serde(rename = "type")]
    pub kind: AssessmentType,
    /// Raw score. Non-positive scores fall back to the predicted grade.
    pub score: f64,
    /// Date the assessment (or session) took place.
    pub date: NaiveDate,
}

impl HistoryEntry {
    pub fn new(
        subject: impl Into<String>,
        kind: AssessmentType,
        score: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            subject: subject.into(),
            kind,
            score,
            date,
        }
    }

    /// Returns `true` if this entry was created by the session generator.
    pub fn is_synthetic(&self) -> bool {
        self.kind.is_synthetic()
    }
}

/// Baseline score per subject in `[0, 1]`, ordered by subject name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct PredictedGrades(BTreeMap<String, f64>);

impl PredictedGrades {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(subject, grade)` pairs, rejecting grades outside `[0, 1]`.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, RecommenderError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut grades = Self::new();
        for (subject, grade) in pairs {
            grades.insert(subject, grade)?;
        }
        Ok(grades)
    }

    /// Insert or replace a subject's predicted grade.
    pub fn insert(
        &mut self,
        subject: impl Into<String>,
        grade: f64,
    ) -> Result<(), RecommenderError> {
        let subject = subject.into();
        if !grade.is_finite() || !(0.0..=1.0).contains(&grade) {
            return Err(RecommenderError::InvalidConfig(format!(
                "predicted grade for '{subject}' must be within [0, 1], got {grade}"
            )));
        }
        self.0.insert(subject, grade);
        Ok(())
    }

    pub fn get(&self, subject: &str) -> Option<f64> {
        self.0.get(subject).copied()
    }

    pub fn contains(&self, subject: &str) -> bool {
        self.0.contains_key(subject)
    }

    /// Subjects in alphabetical order.
    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(s, g)| (s.as_str(), *g))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<BTreeMap<String, f64>> for PredictedGrades {
    type Error = RecommenderError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        Self::from_pairs(map)
    }
}

impl From<PredictedGrades> for BTreeMap<String, f64> {
    fn from(grades: PredictedGrades) -> Self {
        grades.0
    }
}

/// The plan produced by one shot of the session generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPlan {
    /// 1-based shot number within the run.
    pub shot: u32,
    /// Date the sessions are planned for.
    pub date: NaiveDate,
    /// Recommended subject per session, in priority order.
    pub subjects: Vec<String>,
    /// Study slot length in minutes.
    pub session_time: u32,
    /// Break length in minutes.
    pub break_time: u32,
    /// Synthetic entries this shot appended to the history.
    #[serde(default)]
    pub new_entries: Vec<HistoryEntry>,
}

impl SessionPlan {
    /// A shuffled copy of the subjects for display. The plan itself is untouched.
    pub fn display_order<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let mut subjects = self.subjects.clone();
        subjects.shuffle(rng);
        subjects
    }

    /// Total minutes of study plus breaks this plan schedules.
    pub fn total_minutes(&self) -> u32 {
        self.subjects.len() as u32 * (self.session_time + self.break_time)
    }
}

/// Every plan of one generator invocation plus the resulting history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    /// Unique run identifier.
    pub id: Uuid,
    /// Date the run was planned for; also the reference date for recency.
    pub session_date: NaiveDate,
    /// One plan per shot, in execution order.
    pub plans: Vec<SessionPlan>,
    /// The base snapshot followed by every synthetic entry the run appended.
    pub history: Vec<HistoryEntry>,
}

impl Run {
    /// All synthetic entries the run produced, in shot order.
    pub fn new_entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.plans.iter().flat_map(|p| p.new_entries.iter())
    }
}

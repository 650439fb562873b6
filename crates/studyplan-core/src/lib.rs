//! studyplan-core: Scoring pipeline and session generation.
//!
//! This crate turns a learner's assessment history and predicted grades into
//! an ordered study plan: entries are weighted, aggregated per subject,
//! normalised into a priority distribution, and fed through the session
//! generator that appends synthetic history between passes.

pub mod aggregation;
pub mod analysis;
pub mod config;
pub mod error;
pub mod generator;
pub mod memory;
pub mod model;
pub mod normalisation;
pub mod pipeline;
pub mod reset;
pub mod traits;
pub mod weighting;

pub use analysis::{analyse_run, RunSummary};
pub use config::RecommenderConfig;
pub use error::{RecommenderError, Result, StoreError};
pub use generator::{PlanRequest, SessionGenerator};
pub use model::{AssessmentType, HistoryEntry, PredictedGrades, Run, SessionPlan};

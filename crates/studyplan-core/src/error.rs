//! Error types for the scoring pipeline and its collaborators.
//!
//! Pipeline stages return [`RecommenderError`] and never recover from one:
//! the session generator propagates the first failure and lets the caller
//! decide whether to continue. Storage failures are carried as
//! [`StoreError`] so they reach the caller exactly as the store reported them.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::AssessmentType;

/// Convenience alias used throughout the core crate.
pub type Result<T, E = RecommenderError> = std::result::Result<T, E>;

/// Errors raised by the weighting, aggregation, normalisation, or generation stages.
#[derive(Debug, Error)]
pub enum RecommenderError {
    /// The type-weight table has no entry for an assessment type in the history.
    #[error("no weight configured for assessment type '{0}'")]
    UnknownAssessmentType(AssessmentType),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A subject has neither a usable score nor a predicted-grade fallback.
    #[error("subject '{0}' has no usable score and no predicted grade")]
    MissingData(String),

    /// Aggregate scores cannot be turned into a distribution.
    #[error("cannot normalise {subjects} subject score(s): total is zero")]
    DegenerateDistribution { subjects: usize },

    /// The history store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RecommenderError {
    /// Returns `true` for errors caused by configuration rather than data.
    ///
    /// A history entry with an unrecognised type label counts: the type table
    /// it would need a weight from does not cover it.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RecommenderError::UnknownAssessmentType(_)
                | RecommenderError::InvalidConfig(_)
                | RecommenderError::Store(StoreError::UnknownAssessmentType { .. })
        )
    }
}

/// Errors surfaced by a [`HistoryStore`](crate::traits::HistoryStore) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file or service could not be reached.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored payload could not be understood.
    #[error("malformed data in {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    /// A stored entry names an assessment type that does not exist.
    #[error("unknown assessment type '{label}' in {}", path.display())]
    UnknownAssessmentType { path: PathBuf, label: String },
}

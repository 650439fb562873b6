//! Configuration records injected into every pipeline stage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RecommenderError, Result};
use crate::model::AssessmentType;

/// Weight per assessment type, each in `(0, 1]`.
///
/// Stored keyed by label ("Topic Test", "Mock Exam", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct TypeWeights(BTreeMap<AssessmentType, f64>);

impl TypeWeights {
    /// An empty table. Weighting any entry against it fails.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, kind: AssessmentType, weight: f64) -> Self {
        self.0.insert(kind, weight);
        self
    }

    pub fn without(mut self, kind: AssessmentType) -> Self {
        self.0.remove(&kind);
        self
    }

    /// Look up the weight for `kind`, failing if the table has none.
    pub fn weight(&self, kind: AssessmentType) -> Result<f64> {
        self.0
            .get(&kind)
            .copied()
            .ok_or(RecommenderError::UnknownAssessmentType(kind))
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssessmentType, f64)> + '_ {
        self.0.iter().map(|(k, w)| (*k, *w))
    }

    fn validate(&self) -> Result<()> {
        for (kind, weight) in self.iter() {
            if !weight.is_finite() || weight <= 0.0 || weight > 1.0 {
                return Err(RecommenderError::InvalidConfig(format!(
                    "weight for '{kind}' must be within (0, 1], got {weight}"
                )));
            }
        }
        Ok(())
    }
}

impl TryFrom<BTreeMap<String, f64>> for TypeWeights {
    type Error = String;

    fn try_from(map: BTreeMap<String, f64>) -> std::result::Result<Self, Self::Error> {
        map.into_iter()
            .map(|(label, weight)| -> std::result::Result<_, String> {
                Ok((label.parse::<AssessmentType>()?, weight))
            })
            .collect::<std::result::Result<BTreeMap<_, _>, String>>()
            .map(Self)
    }
}

impl From<TypeWeights> for BTreeMap<String, f64> {
    fn from(weights: TypeWeights) -> Self {
        weights
            .0
            .into_iter()
            .map(|(kind, weight)| (kind.label().to_string(), weight))
            .collect()
    }
}

impl Default for TypeWeights {
    fn default() -> Self {
        Self::empty()
            .with(AssessmentType::Revision, 0.1)
            .with(AssessmentType::NotStudied, 0.1)
            .with(AssessmentType::Homework, 0.2)
            .with(AssessmentType::Quiz, 0.3)
            .with(AssessmentType::TopicTest, 0.4)
            .with(AssessmentType::MockExam, 0.5)
            .with(AssessmentType::Exam, 0.6)
    }
}

/// Bounds of the recency factor applied to older entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecencyConfig {
    /// Factor for entries at or beyond `zero_day_threshold` days old.
    #[serde(default = "default_min_weight")]
    pub min_weight: f64,
    /// Factor for entries dated on (or after) the run date.
    #[serde(default = "default_max_weight")]
    pub max_weight: f64,
    /// Age in days at which the factor bottoms out.
    #[serde(default = "default_zero_day_threshold")]
    pub zero_day_threshold: u32,
}

fn default_min_weight() -> f64 {
    0.1
}
fn default_max_weight() -> f64 {
    1.0
}
fn default_zero_day_threshold() -> u32 {
    180
}

impl Default for RecencyConfig {
    fn default() -> Self {
        Self {
            min_weight: default_min_weight(),
            max_weight: default_max_weight(),
            zero_day_threshold: default_zero_day_threshold(),
        }
    }
}

impl RecencyConfig {
    fn validate(&self) -> Result<()> {
        if !(self.max_weight > 0.0 && self.max_weight <= 1.0) {
            return Err(RecommenderError::InvalidConfig(format!(
                "recency max_weight must be within (0, 1], got {}",
                self.max_weight
            )));
        }
        if !(self.min_weight >= 0.0 && self.min_weight <= self.max_weight) {
            return Err(RecommenderError::InvalidConfig(format!(
                "recency min_weight must be within [0, max_weight], got {}",
                self.min_weight
            )));
        }
        Ok(())
    }
}

/// Whether each shot starts from the base snapshot or the previous shot's history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShotMode {
    #[default]
    Independent,
    Chained,
}

impl std::str::FromStr for ShotMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "independent" => Ok(ShotMode::Independent),
            "chained" => Ok(ShotMode::Chained),
            other => Err(format!("unknown shot mode: {other}")),
        }
    }
}

/// Session parameters used when a request does not override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Sessions per shot.
    #[serde(default = "default_count")]
    pub count: u32,
    /// Study slot length in minutes.
    #[serde(default = "default_session_time")]
    pub session_time: u32,
    /// Break length in minutes.
    #[serde(default = "default_break_time")]
    pub break_time: u32,
    /// Number of shots per run. Zero is treated as one.
    #[serde(default = "default_shots")]
    pub shots: u32,
    #[serde(default)]
    pub shot_mode: ShotMode,
    /// How far above its competitors a just-studied subject is lifted.
    /// Must exceed the aggregate rounding step of 0.01.
    #[serde(default = "default_boost_margin")]
    pub boost_margin: f64,
    /// Fraction of a skipped subject's mean removed by each `Not Studied` penalty.
    #[serde(default = "default_skip_decay")]
    pub skip_decay: f64,
}

fn default_count() -> u32 {
    6
}
fn default_session_time() -> u32 {
    45
}
fn default_break_time() -> u32 {
    15
}
fn default_shots() -> u32 {
    1
}
fn default_boost_margin() -> f64 {
    0.05
}
fn default_skip_decay() -> f64 {
    0.1
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            session_time: default_session_time(),
            break_time: default_break_time(),
            shots: default_shots(),
            shot_mode: ShotMode::default(),
            boost_margin: default_boost_margin(),
            skip_decay: default_skip_decay(),
        }
    }
}

/// The full configuration record for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommenderConfig {
    #[serde(default)]
    pub weights: TypeWeights,
    #[serde(default)]
    pub recency: RecencyConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl RecommenderConfig {
    /// Check every range constraint. Generation refuses to start on failure.
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        self.recency.validate()?;
        let session = &self.session;
        if !(session.boost_margin.is_finite() && session.boost_margin > 0.01) {
            return Err(RecommenderError::InvalidConfig(format!(
                "boost_margin must be greater than 0.01, got {}",
                session.boost_margin
            )));
        }
        if !(session.skip_decay > 0.0 && session.skip_decay < 1.0) {
            return Err(RecommenderError::InvalidConfig(format!(
                "skip_decay must be between 0 and 1 (exclusive), got {}",
                session.skip_decay
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_ascend_with_stakes() {
        let weights = TypeWeights::default();
        let ordered = [
            AssessmentType::Revision,
            AssessmentType::Homework,
            AssessmentType::Quiz,
            AssessmentType::TopicTest,
            AssessmentType::MockExam,
            AssessmentType::Exam,
        ];
        for pair in ordered.windows(2) {
            assert!(weights.weight(pair[0]).unwrap() < weights.weight(pair[1]).unwrap());
        }
        assert!(RecommenderConfig::default().validate().is_ok());
    }

    #[test]
    fn missing_weight_is_configuration_error() {
        let weights = TypeWeights::empty().with(AssessmentType::Quiz, 0.3);
        let err = weights.weight(AssessmentType::Exam).unwrap_err();
        assert!(matches!(
            err,
            RecommenderError::UnknownAssessmentType(AssessmentType::Exam)
        ));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut config = RecommenderConfig::default();
        config.weights = TypeWeights::default().with(AssessmentType::Exam, 1.2);
        assert!(config.validate().is_err());

        let mut config = RecommenderConfig::default();
        config.recency.min_weight = 0.9;
        config.recency.max_weight = 0.5;
        assert!(config.validate().is_err());

        let mut config = RecommenderConfig::default();
        config.session.boost_margin = 0.0;
        assert!(config.validate().is_err());

        let mut config = RecommenderConfig::default();
        config.session.boost_margin = 0.01;
        assert!(config.validate().is_err());

        for decay in [0.0, 1.0, f64::NAN] {
            let mut config = RecommenderConfig::default();
            config.session.skip_decay = decay;
            assert!(config.validate().is_err(), "accepted skip_decay {decay}");
        }
    }

    #[test]
    fn parse_partial_config_sections() {
        let config: RecommenderConfig = serde_json::from_str(
            r#"{
                "weights": {"Quiz": 0.3, "Topic Test": 0.4},
                "session": {"count": 3, "shot_mode": "chained"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.weights.weight(AssessmentType::TopicTest).unwrap(), 0.4);
        assert!(config.weights.weight(AssessmentType::Exam).is_err());
        assert_eq!(config.session.count, 3);
        assert_eq!(config.session.session_time, 45);
        assert_eq!(config.session.shot_mode, ShotMode::Chained);
        assert_eq!(config.recency, RecencyConfig::default());
    }

    #[test]
    fn unknown_weight_label_is_rejected() {
        let parsed: std::result::Result<TypeWeights, _> =
            serde_json::from_str(r#"{"Essay": 0.3}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn shot_mode_parse() {
        assert_eq!("Chained".parse::<ShotMode>().unwrap(), ShotMode::Chained);
        assert_eq!(
            "independent".parse::<ShotMode>().unwrap(),
            ShotMode::Independent
        );
        assert!("looped".parse::<ShotMode>().is_err());
    }
}

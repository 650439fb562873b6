//! Configuration file loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use studyplan_core::config::{RecencyConfig, SessionConfig, TypeWeights};
use studyplan_core::RecommenderConfig;

use crate::json::JsonFileStore;

/// Locations of the data files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_history_path")]
    pub history: PathBuf,
    #[serde(default = "default_predicted_grades_path")]
    pub predicted_grades: PathBuf,
}

fn default_history_path() -> PathBuf {
    PathBuf::from("data/history.json")
}
fn default_predicted_grades_path() -> PathBuf {
    PathBuf::from("data/predicted_grades.json")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            history: default_history_path(),
            predicted_grades: default_predicted_grades_path(),
        }
    }
}

/// Top-level studyplan configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyplanConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub weights: TypeWeights,
    #[serde(default)]
    pub recency: RecencyConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl StudyplanConfig {
    /// The pipeline configuration record.
    pub fn recommender(&self) -> RecommenderConfig {
        RecommenderConfig {
            weights: self.weights.clone(),
            recency: self.recency.clone(),
            session: self.session.clone(),
        }
    }

    /// A store over the configured data files.
    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(self.data.history.clone(), self.data.predicted_grades.clone())
    }

    fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.data.history, &mut self.data.predicted_grades] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("STUDYPLAN_HISTORY") {
            self.data.history = PathBuf::from(path);
        }
        if let Some(path) = lookup("STUDYPLAN_PREDICTED_GRADES") {
            self.data.predicted_grades = PathBuf::from(path);
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `studyplan.toml` in the current directory
/// 2. `~/.config/studyplan/config.toml`
///
/// Environment variable overrides: `STUDYPLAN_HISTORY`, `STUDYPLAN_PREDICTED_GRADES`.
pub fn load_config() -> Result<StudyplanConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
///
/// Relative data paths in a config file are resolved against the file's directory.
pub fn load_config_from(path: Option<&Path>) -> Result<StudyplanConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("studyplan.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let mut config = toml::from_str::<StudyplanConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            if let Some(base) = path.parent() {
                config.resolve_paths(base);
            }
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => StudyplanConfig::default(),
    };

    config.apply_env_overrides(|name| std::env::var(name).ok());

    config
        .recommender()
        .validate()
        .context("invalid configuration")?;
    Ok(config)
}

/// Load just the assessment-type weight table.
pub fn load_type_weights(path: Option<&Path>) -> Result<TypeWeights> {
    Ok(load_config_from(path)?.weights)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("studyplan"))
}

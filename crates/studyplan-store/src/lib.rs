//! studyplan-store: File-backed history storage and configuration.
//!
//! Implements the `HistoryStore` trait over JSON files and loads the
//! `studyplan.toml` configuration that points at them.

pub mod config;
pub mod json;

pub use config::{load_config, load_config_from, load_type_weights, DataConfig, StudyplanConfig};
pub use json::{
    read_history, read_predicted_grades, reset_history_file, write_history, JsonFileStore,
};

//! The `studyplan reset` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use studyplan_store::{load_config_from, read_history, reset_history_file};

pub fn execute(history_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let path = match history_path {
        Some(path) => path,
        None => load_config_from(config_path.as_deref())?.data.history,
    };

    let before = read_history(&path)
        .with_context(|| format!("failed to read history: {}", path.display()))?
        .len();
    let remaining = reset_history_file(&path)
        .with_context(|| format!("failed to reset history: {}", path.display()))?;

    println!(
        "Removed {} generated entries from {} ({} remaining)",
        before - remaining.len(),
        path.display(),
        remaining.len()
    );

    Ok(())
}

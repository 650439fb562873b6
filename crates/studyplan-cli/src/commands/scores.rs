//! The `studyplan scores` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table};

use studyplan_core::pipeline::recommend_subject;
use studyplan_core::traits::{Clock, HistoryStore, SystemClock};
use studyplan_store::load_config_from;

pub fn execute(date: Option<NaiveDate>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = config.store();

    let history = store
        .load_history()
        .with_context(|| format!("failed to load history: {}", store.history_path().display()))?;
    let predicted = store.load_predicted_grades().with_context(|| {
        format!(
            "failed to load predicted grades: {}",
            store.predicted_grades_path().display()
        )
    })?;
    let today = date.unwrap_or_else(|| SystemClock.today());

    let recommendation = recommend_subject(&history, &predicted, &config.recommender(), today)
        .context("failed to score subjects")?;

    let mut table = Table::new();
    table.set_header(vec!["Subject", "Aggregate", "Normalised", "Predicted"]);
    for aggregate in &recommendation.aggregates {
        let normalised = recommendation
            .distribution
            .get(&aggregate.subject)
            .unwrap_or(0.0);
        let predicted_grade = predicted
            .get(&aggregate.subject)
            .map(|g| format!("{g:.2}"))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&aggregate.subject),
            Cell::new(format!("{:.2}", aggregate.aggregate_score)),
            Cell::new(format!("{normalised:.3}")),
            Cell::new(predicted_grade),
        ]);
    }

    println!("Scores as of {today} ({} history entries)", history.len());
    println!("{table}");
    println!("Recommended next subject: {}", recommendation.subject);

    Ok(())
}

//! The `studyplan plan` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use studyplan_core::config::ShotMode;
use studyplan_core::memory::InMemoryStore;
use studyplan_core::traits::{HistoryStore, SystemClock};
use studyplan_core::{PlanRequest, SessionGenerator};
use studyplan_report::{format_analysis, format_plan, generate_markdown, RunReport};
use studyplan_store::load_config_from;

pub struct PlanOptions {
    pub count: Option<u32>,
    pub session_time: Option<u32>,
    pub break_time: Option<u32>,
    pub shots: Option<u32>,
    pub date: Option<NaiveDate>,
    pub shot_mode: Option<ShotMode>,
    pub shuffle: bool,
    pub seed: Option<u64>,
    pub dry_run: bool,
    pub format: String,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub fn execute(opts: PlanOptions) -> Result<()> {
    let config = load_config_from(opts.config.as_deref())?;
    let file_store = config.store();

    let store: Arc<dyn HistoryStore> = if opts.dry_run {
        let history = file_store.load_history().with_context(|| {
            format!("failed to load history: {}", file_store.history_path().display())
        })?;
        let predicted = file_store.load_predicted_grades().with_context(|| {
            format!(
                "failed to load predicted grades: {}",
                file_store.predicted_grades_path().display()
            )
        })?;
        tracing::debug!("dry run, history will not be modified");
        Arc::new(InMemoryStore::new(history, predicted))
    } else {
        Arc::new(file_store)
    };

    let generator = SessionGenerator::new(store, Arc::new(SystemClock), config.recommender());
    let run = generator
        .generate_session_plan(PlanRequest {
            count: opts.count,
            session_time: opts.session_time,
            break_time: opts.break_time,
            shots: opts.shots,
            shot_mode: opts.shot_mode,
            session_date: opts.date,
            ..Default::default()
        })
        .context("failed to generate study plan")?;

    let session_count = opts.count.unwrap_or(config.session.count);
    let report = RunReport::from_run(&run, session_count);

    let rendered = match opts.format.as_str() {
        "json" => report.to_json()?,
        "markdown" | "md" => generate_markdown(&report),
        "text" => render_text(&report, opts.shuffle, opts.seed),
        other => anyhow::bail!("unknown format: {other} (expected text, markdown, or json)"),
    };

    match &opts.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &rendered)
                .with_context(|| format!("failed to write output to {}", path.display()))?;
            eprintln!("Plan saved to: {}", path.display());
        }
        None => println!("{rendered}"),
    }

    if opts.dry_run {
        eprintln!("Dry run: history was not modified.");
    }

    Ok(())
}

fn render_text(report: &RunReport, shuffle: bool, seed: Option<u64>) -> String {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let multi_shot = report.plans.len() > 1;

    let mut sections = Vec::with_capacity(report.plans.len() + 1);
    for plan in &report.plans {
        let subjects = if shuffle {
            plan.display_order(&mut rng)
        } else {
            plan.subjects.clone()
        };
        sections.push(format_plan(&subjects, multi_shot.then_some(plan.shot)));
    }
    sections.push(format_analysis(&report.summary, report.session_count));
    sections.join("\n")
}

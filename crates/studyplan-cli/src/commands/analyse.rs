//! The `studyplan analyse` command.

use std::path::PathBuf;

use anyhow::Result;

use studyplan_report::{format_analysis, format_plan, generate_markdown, RunReport};

pub fn execute(report_path: PathBuf, format: String) -> Result<()> {
    let mut report = RunReport::load_json(&report_path)?;
    report.summary = report.reanalyse();

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", generate_markdown(&report));
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report.summary)?);
        }
        "text" => {
            let multi_shot = report.plans.len() > 1;
            for plan in &report.plans {
                println!("{}", format_plan(&plan.subjects, multi_shot.then_some(plan.shot)));
            }
            println!("{}", format_analysis(&report.summary, report.session_count));
        }
        other => anyhow::bail!("unknown format: {other} (expected text, markdown, or json)"),
    }

    Ok(())
}

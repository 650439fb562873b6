//! Markdown report generator.

use std::path::Path;

use anyhow::{Context, Result};

use crate::json::RunReport;

/// Escape characters that would break a Markdown table cell.
fn md_escape(s: &str) -> String {
    s.replace('|', "\\|")
}

/// Generate a Markdown document for a run report.
pub fn generate_markdown(report: &RunReport) -> String {
    let mut md = String::new();
    let summary = &report.summary;

    md.push_str("# Study plan\n\n");
    md.push_str(&format!(
        "Run `{}` for **{}** | {} shot(s) | {} sessions per shot\n\n",
        report.id, report.session_date, summary.shots, report.session_count
    ));

    for plan in &report.plans {
        md.push_str(&format!("## Shot {}\n\n", plan.shot));
        if plan.subjects.is_empty() {
            md.push_str("No study sessions scheduled.\n\n");
            continue;
        }
        md.push_str(&format!(
            "{} min sessions, {} min breaks, {} min total\n\n",
            plan.session_time,
            plan.break_time,
            plan.total_minutes()
        ));
        md.push_str("| # | Subject |\n|---|---------|\n");
        for (index, subject) in plan.subjects.iter().enumerate() {
            md.push_str(&format!("| {} | {} |\n", index + 1, md_escape(subject)));
        }
        md.push('\n');
    }

    md.push_str("## Insights\n\n");
    if summary.total_sessions == 0 {
        md.push_str("No sessions to analyse.\n");
        return md;
    }

    md.push_str("| Subject | Sessions |\n|---------|----------|\n");
    for (subject, count) in summary.frequency_ranked() {
        md.push_str(&format!("| {} | {count} |\n", md_escape(subject)));
    }
    md.push('\n');

    md.push_str(&format!(
        "- Longest streak: {} (×{})\n",
        summary.longest_streak_subject.as_deref().unwrap_or("N/A"),
        summary.longest_streak
    ));
    match summary.first_repeat_position {
        Some(position) => md.push_str(&format!("- First repeat at session {position}\n")),
        None => md.push_str("- No repeated subjects\n"),
    }
    md.push_str(&format!(
        "- Suggested session count cap: {}\n",
        summary.recommended_session_cap
    ));

    md
}

/// Write a Markdown report to a file.
pub fn write_markdown_report(report: &RunReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, generate_markdown(report))
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use studyplan_core::{analyse_run, SessionPlan};
    use uuid::Uuid;

    use super::*;

    fn make_report(subjects: &[&str]) -> RunReport {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let plans = vec![SessionPlan {
            shot: 1,
            date,
            subjects: subjects.iter().map(|s| s.to_string()).collect(),
            session_time: 45,
            break_time: 15,
            new_entries: vec![],
        }];
        RunReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            session_date: date,
            session_count: subjects.len() as u32,
            summary: analyse_run(&plans),
            plans,
        }
    }

    #[test]
    fn markdown_contains_plan_and_insights() {
        let md = generate_markdown(&make_report(&["Physics", "Biology", "Physics"]));
        assert!(md.starts_with("# Study plan"));
        assert!(md.contains("## Shot 1"));
        assert!(md.contains("| 2 | Biology |"));
        assert!(md.contains("| Physics | 2 |"));
        assert!(md.contains("180 min total"));
        assert!(md.contains("- First repeat at session 3"));
    }

    #[test]
    fn empty_run_has_no_tables() {
        let md = generate_markdown(&make_report(&[]));
        assert!(md.contains("No study sessions scheduled."));
        assert!(md.contains("No sessions to analyse."));
    }

    #[test]
    fn write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.md");
        write_markdown_report(&make_report(&["Maths"]), &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("Maths"));
    }
}

//! Plain-text rendering for the terminal.

use studyplan_core::RunSummary;

/// Render one plan's subjects as a numbered list.
///
/// `shot` is shown in the header when set, which callers do for multi-shot runs.
pub fn format_plan(subjects: &[String], shot: Option<u32>) -> String {
    if subjects.is_empty() {
        return "No study sessions scheduled.".to_string();
    }

    let header = match shot {
        Some(shot) => format!("Study session plan (shot {shot}):"),
        None => "Study session plan:".to_string(),
    };
    let mut lines = vec![header];
    for (index, subject) in subjects.iter().enumerate() {
        lines.push(format!("{}. {subject}", index + 1));
    }
    lines.join("\n")
}

/// Render run-level insights. `session_count` is the configured sessions per shot.
pub fn format_analysis(summary: &RunSummary, session_count: u32) -> String {
    if summary.total_sessions == 0 {
        return "\nNo sessions to analyse.".to_string();
    }

    let frequency = summary
        .frequency_ranked()
        .iter()
        .map(|(subject, count)| format!("{subject}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![
        String::new(),
        "Overall session insights:".to_string(),
        format!("- Shots executed: {}", summary.shots),
        format!("- Total sessions scheduled: {}", summary.total_sessions),
        format!("- Unique subjects scheduled: {}", summary.unique_subjects),
        format!("- Subject frequency: {frequency}"),
        format!(
            "- Longest streak: {} (×{})",
            summary.longest_streak_subject.as_deref().unwrap_or("N/A"),
            summary.longest_streak
        ),
    ];

    match summary.first_repeat_position {
        Some(position) => lines.push(format!("- First repeat detected at session {position}")),
        None => lines.push("- No repeated subjects within this run.".to_string()),
    }
    lines.push(format!(
        "- Suggested session count cap: {} (current: {session_count})",
        summary.recommended_session_cap
    ));

    lines.join("\n")
}

//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn studyplan() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("studyplan").unwrap();
    cmd.env_remove("STUDYPLAN_HISTORY")
        .env_remove("STUDYPLAN_PREDICTED_GRADES");
    cmd
}

/// A temp dir populated by `studyplan init`.
fn initialised() -> TempDir {
    let dir = TempDir::new().unwrap();
    studyplan()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    dir
}

fn history_len(dir: &Path) -> usize {
    let content = std::fs::read_to_string(dir.join("data/history.json")).unwrap();
    let entries: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
    entries.len()
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    studyplan()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created studyplan.toml"))
        .stdout(predicate::str::contains("Created data/predicted_grades.json"))
        .stdout(predicate::str::contains("Created data/history.json"));

    assert!(dir.path().join("studyplan.toml").exists());
    assert_eq!(history_len(dir.path()), 6);
}

#[test]
fn init_skips_existing_files() {
    let dir = initialised();

    studyplan()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("studyplan.toml already exists, skipping."));
}

#[test]
fn plan_prints_plan_and_insights() {
    let dir = initialised();

    studyplan()
        .current_dir(dir.path())
        .args(["plan", "--date", "2025-03-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Study session plan:"))
        .stdout(predicate::str::contains("1. "))
        .stdout(predicate::str::contains("Overall session insights:"))
        .stdout(predicate::str::contains("- Shots executed: 1"))
        .stdout(predicate::str::contains("- Total sessions scheduled: 6"));

    // Five subjects: one revision and four penalties per session.
    assert_eq!(history_len(dir.path()), 6 + 6 * 5);
}

#[test]
fn plan_multiple_shots_numbers_each_plan() {
    let dir = initialised();

    studyplan()
        .current_dir(dir.path())
        .args(["plan", "--date", "2025-03-10", "--shots", "2", "--count", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Study session plan (shot 1):"))
        .stdout(predicate::str::contains("Study session plan (shot 2):"))
        .stdout(predicate::str::contains("- Shots executed: 2"))
        .stdout(predicate::str::contains("(current: 3)"));

    assert_eq!(history_len(dir.path()), 6 + 2 * 3 * 5);
}

#[test]
fn dry_run_leaves_history_untouched() {
    let dir = initialised();
    let before = std::fs::read_to_string(dir.path().join("data/history.json")).unwrap();

    studyplan()
        .current_dir(dir.path())
        .args(["plan", "--dry-run", "--shots", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overall session insights:"))
        .stderr(predicate::str::contains("Dry run"));

    let after = std::fs::read_to_string(dir.path().join("data/history.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn seeded_shuffle_is_repeatable() {
    let dir = initialised();
    let run = || {
        studyplan()
            .current_dir(dir.path())
            .args([
                "plan",
                "--dry-run",
                "--date",
                "2025-03-10",
                "--shuffle",
                "--seed",
                "7",
            ])
            .output()
            .unwrap()
    };

    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn json_report_can_be_analysed() {
    let dir = initialised();

    studyplan()
        .current_dir(dir.path())
        .args([
            "plan",
            "--date",
            "2025-03-10",
            "--shots",
            "2",
            "--format",
            "json",
            "--output",
            "reports/run.json",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Plan saved to"));

    let content = std::fs::read_to_string(dir.path().join("reports/run.json")).unwrap();
    let report: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(report["plans"].as_array().unwrap().len(), 2);
    assert_eq!(report["session_date"], "2025-03-10");
    assert_eq!(report["summary"]["total_sessions"], 12);

    studyplan()
        .current_dir(dir.path())
        .args(["analyse", "--report", "reports/run.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Study session plan (shot 2):"))
        .stdout(predicate::str::contains("- Total sessions scheduled: 12"));

    studyplan()
        .current_dir(dir.path())
        .args(["analyse", "--report", "reports/run.json", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"recommended_session_cap\""));
}

#[test]
fn markdown_format() {
    let dir = initialised();

    studyplan()
        .current_dir(dir.path())
        .args(["plan", "--dry-run", "--format", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Study plan"))
        .stdout(predicate::str::contains("## Shot 1"));
}

#[test]
fn reset_removes_generated_entries() {
    let dir = initialised();

    studyplan()
        .current_dir(dir.path())
        .args(["plan", "--date", "2025-03-10"])
        .assert()
        .success();

    studyplan()
        .current_dir(dir.path())
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 30 generated entries"))
        .stdout(predicate::str::contains("(6 remaining)"));

    assert_eq!(history_len(dir.path()), 6);
}

#[test]
fn reset_explicit_history_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    std::fs::write(
        &path,
        r#"[
  {"subject": "Maths", "type": "Quiz", "score": 60, "date": "2025-03-01"},
  {"subject": "Maths", "type": "Revision", "score": 45, "date": "2025-03-02"}
]"#,
    )
    .unwrap();

    studyplan()
        .arg("reset")
        .arg("--history")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 generated entries"));
}

#[test]
fn reset_missing_history_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");

    studyplan()
        .arg("reset")
        .arg("--history")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    assert!(!path.exists());
}

#[test]
fn unknown_assessment_type_is_named() {
    let dir = initialised();
    std::fs::write(
        dir.path().join("data/history.json"),
        r#"[{"subject": "Maths", "type": "Essay", "score": 70, "date": "2025-03-01"}]"#,
    )
    .unwrap();

    studyplan()
        .current_dir(dir.path())
        .args(["plan", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown assessment type 'Essay'"));
}

#[test]
fn rust_log_keeps_run_logs() {
    let dir = initialised();

    studyplan()
        .current_dir(dir.path())
        .env("RUST_LOG", "warn")
        .args(["plan", "--dry-run", "--date", "2025-03-10"])
        .assert()
        .success()
        .stderr(predicate::str::contains("starting run"));
}

#[test]
fn scores_shows_recommendation() {
    let dir = initialised();

    studyplan()
        .current_dir(dir.path())
        .args(["scores", "--date", "2025-03-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Subject"))
        .stdout(predicate::str::contains("Normalised"))
        .stdout(predicate::str::contains("Recommended next subject:"));
}

#[test]
fn missing_predicted_grades_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("studyplan.toml");
    std::fs::write(&config, "[data]\npredicted_grades = \"missing.json\"\n").unwrap();

    studyplan()
        .current_dir(dir.path())
        .arg("plan")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();

    studyplan()
        .current_dir(dir.path())
        .args(["scores", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn unknown_format_fails() {
    let dir = initialised();

    studyplan()
        .current_dir(dir.path())
        .args(["plan", "--dry-run", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn invalid_date_is_rejected() {
    studyplan()
        .args(["plan", "--date", "2025-13-01"])
        .assert()
        .failure();
}

#[test]
fn help_lists_subcommands() {
    studyplan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("scores"))
        .stdout(predicate::str::contains("analyse"))
        .stdout(predicate::str::contains("reset"));
}

//! The `studyplan init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("studyplan.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("data").context("failed to create data directory")?;
    write_if_missing(Path::new("data/predicted_grades.json"), SAMPLE_PREDICTED_GRADES)?;
    write_if_missing(Path::new("data/history.json"), SAMPLE_HISTORY)?;

    println!("\nNext steps:");
    println!("  1. Edit data/predicted_grades.json and data/history.json");
    println!("  2. Run: studyplan scores");
    println!("  3. Run: studyplan plan");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# studyplan configuration

[data]
history = "data/history.json"
predicted_grades = "data/predicted_grades.json"

[weights]
Revision = 0.1
"Not Studied" = 0.1
Homework = 0.2
Quiz = 0.3
"Topic Test" = 0.4
"Mock Exam" = 0.5
Exam = 0.6

[recency]
min_weight = 0.1
max_weight = 1.0
zero_day_threshold = 180

[session]
count = 6
session_time = 45
break_time = 15
shots = 1
shot_mode = "independent"
boost_margin = 0.05
skip_decay = 0.1
"#;

const SAMPLE_PREDICTED_GRADES: &str = r#"{
  "Biology": 0.6,
  "Chemistry": 0.7,
  "English Literature": 0.65,
  "Maths": 0.8,
  "Physics": 0.5
}
"#;

const SAMPLE_HISTORY: &str = r#"[
  { "subject": "Maths", "type": "Exam", "score": 72, "date": "2025-01-20" },
  { "subject": "Physics", "type": "Quiz", "score": 55, "date": "2025-02-03" },
  { "subject": "Chemistry", "type": "Topic Test", "score": 64, "date": "2025-02-10" },
  { "subject": "Biology", "type": "Homework", "score": 81, "date": "2025-02-14" },
  { "subject": "English Literature", "type": "Mock Exam", "score": 58, "date": "2025-02-21" },
  { "subject": "Physics", "type": "Homework", "score": 0, "date": "2025-02-24" }
]
"#;

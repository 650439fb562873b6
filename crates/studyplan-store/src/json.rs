//! JSON file store.
//!
//! History is a JSON array of entries; predicted grades are a JSON object
//! mapping subject to grade, optionally wrapped in a one-element array.
//! Both files may start with a UTF-8 byte order mark.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;

use studyplan_core::reset::reset_history;
use studyplan_core::traits::HistoryStore;
use studyplan_core::{AssessmentType, HistoryEntry, PredictedGrades, StoreError};

/// A [`HistoryStore`] backed by two JSON files.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    history_path: PathBuf,
    predicted_grades_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(
        history_path: impl Into<PathBuf>,
        predicted_grades_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            history_path: history_path.into(),
            predicted_grades_path: predicted_grades_path.into(),
        }
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    pub fn predicted_grades_path(&self) -> &Path {
        &self.predicted_grades_path
    }
}

impl HistoryStore for JsonFileStore {
    fn load_history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        read_history(&self.history_path)
    }

    fn load_predicted_grades(&self) -> Result<PredictedGrades, StoreError> {
        read_predicted_grades(&self.predicted_grades_path)
    }

    fn append_history(&self, entries: &[HistoryEntry]) -> Result<(), StoreError> {
        let mut history = read_history(&self.history_path)?;
        history.extend_from_slice(entries);
        write_history(&self.history_path, &history)
    }

    fn replace_history(&self, entries: &[HistoryEntry]) -> Result<(), StoreError> {
        write_history(&self.history_path, entries)
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn malformed(path: &Path, reason: impl ToString) -> StoreError {
    StoreError::Malformed {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Read a history file. A missing or blank file is an empty history.
pub fn read_history(path: &Path) -> Result<Vec<HistoryEntry>, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "history file not found, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(io_error(path)(e)),
    };

    let content = strip_bom(&content);
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let items: Vec<Value> = serde_json::from_str(content).map_err(|e| malformed(path, e))?;
    let history = items
        .into_iter()
        .map(|item| parse_entry(path, item))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(path = %path.display(), entries = history.len(), "loaded history");
    Ok(history)
}

fn parse_entry(path: &Path, item: Value) -> Result<HistoryEntry, StoreError> {
    if let Some(label) = item.get("type").and_then(Value::as_str) {
        if !AssessmentType::ALL.iter().any(|kind| kind.label() == label) {
            return Err(StoreError::UnknownAssessmentType {
                path: path.to_path_buf(),
                label: label.to_string(),
            });
        }
    }
    serde_json::from_value(item).map_err(|e| malformed(path, e))
}

/// Read a predicted-grades file.
pub fn read_predicted_grades(path: &Path) -> Result<PredictedGrades, StoreError> {
    let content = std::fs::read_to_string(path).map_err(io_error(path))?;
    let value: Value =
        serde_json::from_str(strip_bom(&content)).map_err(|e| malformed(path, e))?;

    let grades = match value {
        Value::Object(_) => value,
        Value::Array(mut items) if !items.is_empty() => match items.swap_remove(0) {
            object @ Value::Object(_) => object,
            _ => return Err(malformed(path, "first element is not an object")),
        },
        _ => {
            return Err(malformed(
                path,
                "expected an object of subject grades or a list containing one",
            ))
        }
    };

    let grades: PredictedGrades = serde_json::from_value(grades).map_err(|e| malformed(path, e))?;
    tracing::debug!(path = %path.display(), subjects = grades.len(), "loaded predicted grades");
    Ok(grades)
}

/// Write `entries` as pretty JSON, replacing `path` atomically.
pub fn write_history(path: &Path, entries: &[HistoryEntry]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_error(dir))?;

    let mut file = NamedTempFile::new_in(dir).map_err(io_error(dir))?;
    serde_json::to_writer_pretty(&mut file, entries)
        .map_err(io::Error::from)
        .and_then(|()| file.write_all(b"\n"))
        .map_err(io_error(path))?;
    file.persist(path).map_err(|e| io_error(path)(e.error))?;

    tracing::debug!(path = %path.display(), entries = entries.len(), "wrote history");
    Ok(())
}

/// Remove every synthetic entry from the history file at `path`.
///
/// Returns the entries that remain. A missing file is an error: there is
/// nothing to reset and no file is created.
pub fn reset_history_file(path: &Path) -> Result<Vec<HistoryEntry>, StoreError> {
    if !path.exists() {
        return Err(io_error(path)(io::Error::new(
            io::ErrorKind::NotFound,
            "history file not found",
        )));
    }
    let history = read_history(path)?;
    let remaining = reset_history(&history);
    write_history(path, &remaining)?;
    tracing::info!(
        path = %path.display(),
        removed = history.len() - remaining.len(),
        kept = remaining.len(),
        "history reset"
    );
    Ok(remaining)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use studyplan_core::AssessmentType;
    use tempfile::TempDir;

    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn store_in(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::new(
            dir.path().join("history.json"),
            dir.path().join("predicted_grades.json"),
        )
    }

    #[test]
    fn missing_history_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store_in(&dir).load_history().unwrap().is_empty());
    }

    #[test]
    fn history_with_bom_is_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(
            &path,
            "\u{feff}[{\"subject\": \"Maths\", \"type\": \"Quiz\", \"score\": 80, \"date\": \"2025-03-01\"}]",
        )
        .unwrap();
        let history = read_history(&path).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, AssessmentType::Quiz);
    }

    #[test]
    fn unknown_assessment_type_names_the_label() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(
            &path,
            r#"[
  {"subject": "Maths", "type": "Quiz", "score": 60, "date": "2025-03-01"},
  {"subject": "Maths", "type": "Essay", "score": 80, "date": "2025-03-02"}
]"#,
        )
        .unwrap();

        let err = read_history(&path).unwrap_err();
        match &err {
            StoreError::UnknownAssessmentType { path: p, label } => {
                assert_eq!(p, &path);
                assert_eq!(label, "Essay");
            }
            other => panic!("expected an unknown type error, got {other:?}"),
        }
        assert!(err.to_string().contains("'Essay'"));
    }

    #[test]
    fn bad_entry_shape_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");

        std::fs::write(&path, r#"[{"subject": "Maths", "type": "Quiz", "score": 60}]"#).unwrap();
        assert!(matches!(
            read_history(&path),
            Err(StoreError::Malformed { .. })
        ));

        std::fs::write(&path, r#"{"subject": "Maths"}"#).unwrap();
        assert!(matches!(
            read_history(&path),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn predicted_grades_accept_object_or_wrapped_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("predicted_grades.json");

        std::fs::write(&path, r#"{"Physics": 0.5, "Biology": 0.6}"#).unwrap();
        let grades = read_predicted_grades(&path).unwrap();
        assert_eq!(grades.subjects().collect::<Vec<_>>(), vec!["Biology", "Physics"]);

        std::fs::write(&path, r#"[{"Maths": 0.4}]"#).unwrap();
        assert_eq!(read_predicted_grades(&path).unwrap().get("Maths"), Some(0.4));

        std::fs::write(&path, "[]").unwrap();
        assert!(matches!(
            read_predicted_grades(&path),
            Err(StoreError::Malformed { .. })
        ));

        std::fs::write(&path, r#"{"Maths": 4.0}"#).unwrap();
        assert!(read_predicted_grades(&path).is_err());
    }

    #[test]
    fn missing_predicted_grades_is_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            store_in(&dir).load_predicted_grades(),
            Err(StoreError::Io { .. })
        ));
    }

    #[test]
    fn append_extends_stored_history() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let first = HistoryEntry::new("Maths", AssessmentType::Exam, 70.0, day());
        let second = HistoryEntry::new("Maths", AssessmentType::Revision, 45.0, day());

        store.append_history(std::slice::from_ref(&first)).unwrap();
        store.append_history(std::slice::from_ref(&second)).unwrap();
        assert_eq!(store.load_history().unwrap(), vec![first.clone(), second]);

        store.replace_history(std::slice::from_ref(&first)).unwrap();
        assert_eq!(store.load_history().unwrap(), vec![first]);
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("history.json");
        write_history(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "[]");
    }

    #[test]
    fn reset_file_drops_synthetic_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        let real = HistoryEntry::new("Physics", AssessmentType::Quiz, 55.0, day());
        write_history(
            &path,
            &[
                real.clone(),
                HistoryEntry::new("Physics", AssessmentType::Revision, 45.0, day()),
                HistoryEntry::new("Maths", AssessmentType::NotStudied, -30.0, day()),
            ],
        )
        .unwrap();

        let remaining = reset_history_file(&path).unwrap();
        assert_eq!(remaining, vec![real.clone()]);
        assert_eq!(read_history(&path).unwrap(), vec![real]);
    }

    #[test]
    fn reset_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");

        match reset_history_file(&path) {
            Err(StoreError::Io { path: p, source }) => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected a not-found error, got {other:?}"),
        }
        assert!(!path.exists());
    }
}

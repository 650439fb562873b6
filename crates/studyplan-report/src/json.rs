//! Run report with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use studyplan_core::{analyse_run, Run, RunSummary, SessionPlan};

/// A saved run: every plan plus its summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Identifier of the run that produced the plans.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub session_date: NaiveDate,
    /// Configured sessions per shot.
    pub session_count: u32,
    pub plans: Vec<SessionPlan>,
    pub summary: RunSummary,
}

impl RunReport {
    pub fn from_run(run: &Run, session_count: u32) -> Self {
        Self {
            id: run.id,
            created_at: Utc::now(),
            session_date: run.session_date,
            session_count,
            plans: run.plans.clone(),
            summary: analyse_run(&run.plans),
        }
    }

    /// Recompute the summary from the stored plans.
    pub fn reanalyse(&self) -> RunSummary {
        analyse_run(&self.plans)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize report")
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: RunReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

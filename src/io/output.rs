use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::session::{Session, StageStatus};

/// Machine-readable summary of a review session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub session_id: String,
    pub generated_at: DateTime<Utc>,
    pub stages: Vec<StageReport>,
    /// Final applied document, present once stage 7 completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_document: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: u8,
    pub title: String,
    pub status: StageStatus,
    pub skipped: bool,
    pub diagnostics: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub low_confidence_matches: usize,
}

impl SessionReport {
    /// Summarize a session.
    pub fn from_session(session: &Session) -> Self {
        let stages: Vec<StageReport> = session
            .stages()
            .iter()
            .map(|stage| StageReport {
                stage: stage.lens.number(),
                title: stage.lens.title().to_string(),
                status: stage.status,
                skipped: stage.skipped,
                diagnostics: stage.diagnostics.len(),
                accepted: stage.accepted,
                rejected: stage.rejected,
                low_confidence_matches: stage
                    .diagnostics
                    .iter()
                    .filter(|d| d.low_confidence)
                    .count(),
            })
            .collect();

        Self {
            session_id: session.id.to_string(),
            generated_at: Utc::now(),
            stages,
            final_document: session.final_document().map(|s| s.to_string()),
        }
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Write the final applied document as plain text. No formatting metadata
/// is preserved at this boundary.
pub fn write_document(text: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    write!(file, "{}", text)?;
    Ok(())
}

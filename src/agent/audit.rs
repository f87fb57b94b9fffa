//! Interaction audit log
//!
//! Appends one JSON line per agent interaction to `execution.jsonl` under
//! the configured log directory.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::Result;

/// One tool invocation within an interaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepTrace {
    pub tool: String,
    pub output: String,
}

/// One logged interaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub timestamp: String,
    pub query: String,
    pub steps_trace: Vec<StepTrace>,
    pub final_response: String,
    pub latency_seconds: f64,
}

/// Append-only JSONL audit log
pub struct AuditLog {
    log_file: PathBuf,
}

impl AuditLog {
    /// Create the log directory if needed and open the log at
    /// `{log_dir}/execution.jsonl`.
    pub fn new(log_dir: &Path) -> Result<Self> {
        fs::create_dir_all(log_dir)?;
        Ok(Self {
            log_file: log_dir.join("execution.jsonl"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.log_file
    }

    /// Append one interaction.
    pub fn log_interaction(
        &self,
        query: &str,
        steps: Vec<StepTrace>,
        response: &str,
        latency_seconds: f64,
    ) -> Result<()> {
        let entry = AuditEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now().to_rfc3339(),
            query: query.to_string(),
            steps_trace: steps,
            final_response: response.to_string(),
            latency_seconds: (latency_seconds * 10_000.0).round() / 10_000.0,
        };
        let line = serde_json::to_string(&entry)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_appends_json_lines() {
        let dir = tempdir().expect("tempdir");
        let log = AuditLog::new(dir.path()).expect("audit log");

        log.log_interaction(
            "¿Cuántos créditos tiene BFI01?",
            vec![StepTrace {
                tool: "rag".to_string(),
                output: "[UNI] Curso: Física I (BFI01)".to_string(),
            }],
            "Cinco créditos.",
            0.12345,
        )
        .expect("log");
        log.log_interaction("segunda consulta", Vec::new(), "ok", 0.01)
            .expect("log");

        let raw = std::fs::read_to_string(log.path()).expect("read log");
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 2);

        let entry: AuditEntry = serde_json::from_str(lines[0]).expect("parse entry");
        assert_eq!(entry.query, "¿Cuántos créditos tiene BFI01?");
        assert_eq!(entry.steps_trace[0].tool, "rag");
        assert!((entry.latency_seconds - 0.1235).abs() < 1e-9);
    }
}

//! Append-only request audit log.
//!
//! One JSON line per successfully answered request, written after response
//! assembly. Nothing on the hot path ever reads this file, and a write
//! failure is logged rather than surfaced to the client.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::gemini::GenerateContentResponse;

/// What gets persisted per request.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub request_id: Uuid,
    pub image_path: String,
    pub extracted_text: String,
    pub gemini_response: GenerateContentResponse,
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(
        image_path: String,
        extracted_text: String,
        gemini_response: GenerateContentResponse,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            image_path,
            extracted_text,
            gemini_response,
            created_at: Utc::now(),
        }
    }
}

/// Append-only JSONL sink.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append one record. Best-effort: failures are logged and swallowed so
    /// auditing can never break a request that already succeeded.
    pub fn append(&self, record: &AuditRecord) {
        if let Err(e) = self.try_append(record) {
            warn!("Failed to append audit record {}: {}", record.request_id, e);
        } else {
            debug!("Audited request {}", record.request_id);
        }
    }

    fn try_append(&self, record: &AuditRecord) -> anyhow::Result<()> {
        let line = serde_json::to_string(record)?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(text: &str) -> AuditRecord {
        AuditRecord::new(
            "uploads/abc".to_string(),
            text.to_string(),
            GenerateContentResponse::default(),
        )
    }

    #[test]
    fn test_append_writes_one_json_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("audit.jsonl"));

        log.append(&make_record("ASPIRIN 300MG"));
        log.append(&make_record("Paracetamol 500mg"));

        let content = std::fs::read_to_string(dir.path().join("audit.jsonl")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["extracted_text"], "ASPIRIN 300MG");
        assert_eq!(first["image_path"], "uploads/abc");
        assert!(first["request_id"].is_string());
        assert!(first["created_at"].is_string());
    }

    #[test]
    fn test_append_failure_is_swallowed() {
        // Point at a directory that does not exist; append must not panic.
        let log = AuditLog::new(PathBuf::from("/nonexistent-dir/audit.jsonl"));
        log.append(&make_record("anything"));
    }
}

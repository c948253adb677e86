// ==========================================
// Trade Import - Import Job Model
// ==========================================
// The unit of work tracking one file's ingestion from upload through
// terminal status. Jobs are mutated only by the orchestrator while
// running and are never deleted (history stays user-visible).
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// JobStatus
// ==========================================
// queued -> running -> (success | error), with `failed` reachable from
// any point on unhandled error. Exactly one terminal state is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Success,
    Error,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Success => "success",
            JobStatus::Error => "error",
            JobStatus::Failed => "failed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "queued" => Some(JobStatus::Queued),
            "running" => Some(JobStatus::Running),
            "success" => Some(JobStatus::Success),
            "error" => Some(JobStatus::Error),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Success | JobStatus::Error | JobStatus::Failed
        )
    }
}

// ==========================================
// ImportJob
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportJob {
    pub job_id: String,
    /// Owning organization; every persisted row is scoped by it.
    pub org_id: String,
    /// Source file reference in object storage.
    pub bucket: String,
    pub object_path: String,
    pub status: JobStatus,
    /// None until the file has been parsed.
    pub total_rows: Option<i64>,
    pub success_rows: i64,
    pub error_rows: i64,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ImportJob {
    /// Fresh job in `queued` state, counters at zero.
    pub fn new(job_id: String, org_id: String, bucket: String, object_path: String) -> Self {
        Self {
            job_id,
            org_id,
            bucket,
            object_path,
            status: JobStatus::Queued,
            total_rows: None,
            success_rows: 0,
            error_rows: 0,
            started_at: None,
            finished_at: None,
            created_at: Utc::now(),
        }
    }
}

// ==========================================
// ImportJobError
// ==========================================
// One record per rejected row (or per failed batch / system failure).
// Append-only; the raw input is preserved for user inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportJobError {
    pub job_id: String,
    /// 1-based position in the original parsed row sequence. Assigned
    /// before filtering, so numbering is stable regardless of how many
    /// earlier rows were valid. 0 for errors outside the row loop.
    pub row_number: i64,
    /// Original row content as JSON, for debugging.
    pub raw_data: serde_json::Value,
    pub error_code: JobErrorCode,
    pub error_detail: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobErrorCode {
    #[serde(rename = "VALIDATION_ERROR")]
    ValidationError,
    #[serde(rename = "INSERT_ERROR")]
    InsertError,
    #[serde(rename = "SYSTEM_ERROR")]
    SystemError,
}

impl JobErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobErrorCode::ValidationError => "VALIDATION_ERROR",
            JobErrorCode::InsertError => "INSERT_ERROR",
            JobErrorCode::SystemError => "SYSTEM_ERROR",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "VALIDATION_ERROR" => Some(JobErrorCode::ValidationError),
            "INSERT_ERROR" => Some(JobErrorCode::InsertError),
            "SYSTEM_ERROR" => Some(JobErrorCode::SystemError),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            JobStatus::Queued,
            JobStatus::Running,
            JobStatus::Success,
            JobStatus::Error,
            JobStatus::Failed,
        ] {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(JobStatus::parse("cancelled"), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Success.is_terminal());
        assert!(JobStatus::Error.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_new_job_defaults() {
        let job = ImportJob::new(
            "j1".into(),
            "org1".into(),
            "uploads".into(),
            "file.csv".into(),
        );
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.total_rows, None);
        assert_eq!(job.success_rows, 0);
        assert_eq!(job.error_rows, 0);
        assert!(job.started_at.is_none());
    }
}

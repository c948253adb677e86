// ==========================================
// Trade Import - Import Job Repository Trait
// ==========================================
// Data access for the job lifecycle and its append-only error log.
// No business rules here - the orchestrator owns the state machine.
// ==========================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ImportJob, ImportJobError, JobStatus};
use crate::repository::error::RepoResult;

#[async_trait]
pub trait ImportJobRepository: Send + Sync {
    /// Persist a freshly created job (status `queued`).
    async fn create_job(&self, job: &ImportJob) -> RepoResult<()>;

    async fn get_job(&self, job_id: &str) -> RepoResult<Option<ImportJob>>;

    /// queued -> running; sets `started_at`.
    async fn mark_running(&self, job_id: &str, started_at: DateTime<Utc>) -> RepoResult<()>;

    /// Recorded once the file has been parsed.
    async fn set_total_rows(&self, job_id: &str, total_rows: i64) -> RepoResult<()>;

    /// Terminal transition to `success` or `error` with final counters.
    /// `finished_at` is always set.
    async fn finish_job(
        &self,
        job_id: &str,
        status: JobStatus,
        success_rows: i64,
        error_rows: i64,
        finished_at: DateTime<Utc>,
    ) -> RepoResult<()>;

    /// Terminal transition to `failed`. Counters are left as they were
    /// when the failure hit; they may not reconcile with `total_rows`.
    async fn mark_failed(&self, job_id: &str, finished_at: DateTime<Utc>) -> RepoResult<()>;

    /// Append one error record. The error log is append-only.
    async fn append_error(&self, error: &ImportJobError) -> RepoResult<()>;

    /// Detailed error log for a job, in insertion order.
    async fn list_errors(&self, job_id: &str) -> RepoResult<Vec<ImportJobError>>;
}

// ==========================================
// Trade Import - Import Job Orchestrator
// ==========================================
// Drives one job through its lifecycle: download, parse, canonicalize,
// validate, batch-upsert, finalize. Row- and batch-level problems are
// recorded and processing continues; anything else fails the job.
// ==========================================

use chrono::Utc;
use tracing::{info, warn};

use crate::config::ImportConfig;
use crate::domain::{
    raw_row_to_json, ImportJob, ImportJobError, JobErrorCode, JobStatus, TargetTable,
};
use crate::importer::cancel::CancellationToken;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::parse_object;
use crate::importer::header_mapper::HeaderMapping;
use crate::importer::resolver::AliasResolver;
use crate::importer::row_canonicalizer::{DroppedColumnSink, RowCanonicalizer};
use crate::repository::{ImportJobRepository, ShipmentRepository};
use crate::storage::ObjectStorage;

/// What the caller hands the orchestrator. The job row must already
/// exist in `queued` state.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub job_id: String,
    pub org_id: String,
    pub bucket: String,
    pub object_path: String,
}

impl JobRequest {
    pub fn from_job(job: &ImportJob) -> Self {
        Self {
            job_id: job.job_id.clone(),
            org_id: job.org_id.clone(),
            bucket: job.bucket.clone(),
            object_path: job.object_path.clone(),
        }
    }
}

/// Final counters for one finished job.
#[derive(Debug, Clone, serde::Serialize)]
pub struct JobSummary {
    pub success: bool,
    pub job_id: String,
    pub status: JobStatus,
    pub total_rows: i64,
    pub success_rows: i64,
    pub error_rows: i64,
}

pub struct ImportOrchestrator<S, J, R>
where
    S: ObjectStorage,
    J: ImportJobRepository,
    R: ShipmentRepository,
{
    storage: S,
    job_repo: J,
    shipment_repo: R,
    config: ImportConfig,
    resolver: AliasResolver,
    dropped_sink: Option<Box<dyn DroppedColumnSink>>,
}

impl<S, J, R> ImportOrchestrator<S, J, R>
where
    S: ObjectStorage,
    J: ImportJobRepository,
    R: ShipmentRepository,
{
    pub fn new(storage: S, job_repo: J, shipment_repo: R, config: ImportConfig) -> Self {
        Self {
            storage,
            job_repo,
            shipment_repo,
            config: config.normalized(),
            resolver: AliasResolver::for_table(TargetTable::Shipments),
            dropped_sink: None,
        }
    }

    /// Observe columns the canonicalizer drops. Off by default.
    pub fn with_dropped_sink(mut self, sink: Box<dyn DroppedColumnSink>) -> Self {
        self.dropped_sink = Some(sink);
        self
    }

    /// Run one job to a terminal state.
    ///
    /// On a system-level error (including cancellation) the job is moved
    /// to `failed` with a best-effort SYSTEM_ERROR record, counters left
    /// as they were when the failure hit, and the error is returned.
    pub async fn run_job(
        &self,
        request: &JobRequest,
        cancel: &CancellationToken,
    ) -> ImportResult<JobSummary> {
        info!(job_id = %request.job_id, object = %request.object_path, "import job starting");
        match self.process(request, cancel).await {
            Ok(summary) => {
                info!(
                    job_id = %request.job_id,
                    status = summary.status.as_str(),
                    total = summary.total_rows,
                    success = summary.success_rows,
                    errors = summary.error_rows,
                    "import job finished"
                );
                Ok(summary)
            }
            Err(err) => {
                warn!(job_id = %request.job_id, error = %err, "import job failed");
                self.fail_job(&request.job_id, &err).await;
                Err(err)
            }
        }
    }

    async fn process(
        &self,
        request: &JobRequest,
        cancel: &CancellationToken,
    ) -> ImportResult<JobSummary> {
        self.job_repo
            .mark_running(&request.job_id, Utc::now())
            .await?;

        let bytes = self
            .storage
            .download(&request.bucket, &request.object_path)
            .await?;
        let parsed = parse_object(&request.object_path, &bytes)?;

        let total_rows = parsed.rows.len() as i64;
        self.job_repo
            .set_total_rows(&request.job_id, total_rows)
            .await?;
        info!(
            job_id = %request.job_id,
            total = total_rows,
            columns = parsed.headers.len(),
            "file parsed"
        );

        let mapping = HeaderMapping::from_headers(&self.resolver, &parsed.headers);
        let mut canonicalizer = RowCanonicalizer::new(&self.resolver);
        if let Some(sink) = self.dropped_sink.as_deref() {
            canonicalizer = canonicalizer.with_dropped_sink(sink);
        }

        let mut success_rows: i64 = 0;
        let mut error_rows: i64 = 0;
        let mut valid = Vec::new();

        // Row numbers are 1-based over the parsed sequence, assigned
        // before validation so they stay stable across filtering.
        for (index, raw) in parsed.rows.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(ImportError::Cancelled);
            }
            let row_number = (index + 1) as i64;
            let row = canonicalizer.to_canonical_row(row_number as usize, raw, Some(&mapping));

            match row.company_name() {
                Some(name)
                    if !name.trim().is_empty() && name != self.config.company_placeholder =>
                {
                    valid.push((row_number, row));
                }
                _ => {
                    error_rows += 1;
                    self.job_repo
                        .append_error(&ImportJobError {
                            job_id: request.job_id.clone(),
                            row_number,
                            raw_data: raw_row_to_json(raw),
                            error_code: JobErrorCode::ValidationError,
                            error_detail: "missing or placeholder company name".to_string(),
                            created_at: Utc::now(),
                        })
                        .await?;
                }
            }
        }

        for batch in valid.chunks(self.config.batch_size) {
            if cancel.is_cancelled() {
                return Err(ImportError::Cancelled);
            }
            match self
                .shipment_repo
                .upsert_batch(&request.org_id, batch)
                .await
            {
                Ok(written) => {
                    success_rows += written as i64;
                }
                Err(err) => {
                    // A failed batch rejects every row in it, but the
                    // job carries on with the next batch.
                    let first = batch[0].0;
                    let last = batch[batch.len() - 1].0;
                    warn!(
                        job_id = %request.job_id,
                        rows = batch.len(),
                        first_row = first,
                        error = %err,
                        "batch upsert failed"
                    );
                    error_rows += batch.len() as i64;
                    self.job_repo
                        .append_error(&ImportJobError {
                            job_id: request.job_id.clone(),
                            row_number: first,
                            raw_data: serde_json::json!({
                                "batch_first_row": first,
                                "batch_last_row": last,
                                "batch_size": batch.len(),
                            }),
                            error_code: JobErrorCode::InsertError,
                            error_detail: format!("batch insert failed: {err}"),
                            created_at: Utc::now(),
                        })
                        .await?;
                }
            }
        }

        let status = if error_rows == 0 && success_rows > 0 {
            JobStatus::Success
        } else {
            JobStatus::Error
        };
        self.job_repo
            .finish_job(&request.job_id, status, success_rows, error_rows, Utc::now())
            .await?;

        Ok(JobSummary {
            success: status == JobStatus::Success,
            job_id: request.job_id.clone(),
            status,
            total_rows,
            success_rows,
            error_rows,
        })
    }

    /// Best effort: record the system error and move the job to
    /// `failed`. Failures here are logged and swallowed so the original
    /// error is the one the caller sees.
    async fn fail_job(&self, job_id: &str, err: &ImportError) {
        let record = ImportJobError {
            job_id: job_id.to_string(),
            row_number: 0,
            raw_data: serde_json::Value::Null,
            error_code: JobErrorCode::SystemError,
            error_detail: err.to_string(),
            created_at: Utc::now(),
        };
        if let Err(e) = self.job_repo.append_error(&record).await {
            warn!(job_id = %job_id, error = %e, "could not record system error");
        }
        if let Err(e) = self.job_repo.mark_failed(job_id, Utc::now()).await {
            warn!(job_id = %job_id, error = %e, "could not mark job failed");
        }
    }
}

// ==========================================
// Trade Import - Import API
// ==========================================
// Caller-facing facade: create-and-run import jobs, preview header
// mappings, read back job state and error logs. Wires concrete
// repositories to the orchestrator.
// ==========================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ImportConfig;
use crate::domain::{ImportJob, ImportJobError, TargetTable};
use crate::importer::cancel::CancellationToken;
use crate::importer::header_mapper::{preview_header_mapping, HeaderPreview};
use crate::importer::orchestrator::{ImportOrchestrator, JobRequest, JobSummary};
use crate::importer::resolver::AliasResolver;
use crate::repository::{
    ImportJobRepository, ImportJobRepositoryImpl, ShipmentRepositoryImpl,
};
use crate::storage::ObjectStorage;

/// Caller request for one import run. Without a job_id a fresh one is
/// generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportJobRequest {
    pub job_id: Option<String>,
    pub org_id: String,
    pub bucket: String,
    pub object_path: String,
}

pub struct ImportApi<S>
where
    S: ObjectStorage + Clone,
{
    db_path: String,
    storage: S,
    config: ImportConfig,
    resolver: AliasResolver,
}

impl<S> ImportApi<S>
where
    S: ObjectStorage + Clone,
{
    pub fn new(db_path: String, storage: S, config: ImportConfig) -> Self {
        Self {
            db_path,
            storage,
            config: config.normalized(),
            resolver: AliasResolver::for_table(TargetTable::Shipments),
        }
    }

    /// Create the job record and run it to a terminal state.
    pub async fn run_import(
        &self,
        request: ImportJobRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<JobSummary> {
        if request.org_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("org_id must not be empty".into()));
        }
        if request.object_path.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "object_path must not be empty".into(),
            ));
        }

        let job_id = request
            .job_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let job = ImportJob::new(
            job_id,
            request.org_id,
            request.bucket,
            request.object_path,
        );

        let job_repo = ImportJobRepositoryImpl::new(&self.db_path)?;
        let shipment_repo = ShipmentRepositoryImpl::new(&self.db_path)?;
        job_repo.create_job(&job).await?;

        let orchestrator = ImportOrchestrator::new(
            self.storage.clone(),
            job_repo,
            shipment_repo,
            self.config.clone(),
        );
        let summary = orchestrator
            .run_job(&JobRequest::from_job(&job), cancel)
            .await?;
        Ok(summary)
    }

    /// Upload-time preview: how each raw header would map. Touches no
    /// job or storage state.
    pub fn preview_headers(&self, headers: &[String]) -> Vec<HeaderPreview> {
        preview_header_mapping(&self.resolver, headers)
    }

    pub async fn get_job(&self, job_id: &str) -> ApiResult<ImportJob> {
        let job_repo = ImportJobRepositoryImpl::new(&self.db_path)?;
        job_repo
            .get_job(job_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("import_job (id={job_id})")))
    }

    pub async fn list_job_errors(&self, job_id: &str) -> ApiResult<Vec<ImportJobError>> {
        let job_repo = ImportJobRepositoryImpl::new(&self.db_path)?;
        Ok(job_repo.list_errors(job_id).await?)
    }
}

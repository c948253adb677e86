// ==========================================
// Import job end-to-end tests
// ==========================================
// Full pipeline runs against a temp SQLite database and a local
// object-storage root: upload a file, run the job, inspect final
// status, counters, error log, and persisted shipments.
// ==========================================


use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use trade_import::api::{ApiError, ImportApi, ImportJobRequest};
use trade_import::config::ImportConfig;
use trade_import::domain::{CanonicalRow, JobErrorCode, JobStatus};
use trade_import::importer::{CancellationToken, ImportError, ImportOrchestrator, JobRequest};
use trade_import::repository::{
    ImportJobRepository, ImportJobRepositoryImpl, RepoResult, RepositoryError,
    ShipmentRepository, ShipmentRepositoryImpl,
};
use trade_import::storage::LocalFileStorage;

fn request(org_id: &str, path: &str) -> ImportJobRequest {
    ImportJobRequest {
        job_id: None,
        org_id: org_id.to_string(),
        bucket: "uploads".to_string(),
        object_path: path.to_string(),
    }
}

#[tokio::test]
async fn test_all_valid_rows_import_successfully() {
    let (_db_file, db_path) = test_helpers::create_test_db().unwrap();
    let csv = "Company Name,HS Code,Value (USD),Shipment Date\n\
               Acme Corp,847130,\"$1,250.00\",2026-01-15\n\
               Beta Trading,620342,980.5,2026-02-01\n";
    let storage_root =
        test_helpers::create_storage_with_object("uploads", "org1/trades.csv", csv.as_bytes())
            .unwrap();

    let api = ImportApi::new(
        db_path.clone(),
        LocalFileStorage::new(storage_root.path()),
        ImportConfig::default(),
    );
    let summary = api
        .run_import(request("org1", "org1/trades.csv"), &CancellationToken::new())
        .await
        .unwrap();

    assert!(summary.success);
    assert_eq!(summary.status, JobStatus::Success);
    assert_eq!(summary.total_rows, 2);
    assert_eq!(summary.success_rows, 2);
    assert_eq!(summary.error_rows, 0);

    let job = api.get_job(&summary.job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Success);
    assert_eq!(job.total_rows, Some(2));
    assert!(job.started_at.is_some());
    assert!(job.finished_at.is_some());

    let shipments = ShipmentRepositoryImpl::new(&db_path).unwrap();
    assert_eq!(shipments.count_for_org("org1").await.unwrap(), 2);
}

#[tokio::test]
async fn test_invalid_rows_are_recorded_and_skipped() {
    let (_db_file, db_path) = test_helpers::create_test_db().unwrap();
    // Row 2 has no company name.
    let csv = "Company Name,HS Code\n\
               Acme Corp,847130\n\
               ,620342\n\
               Beta Trading,620343\n";
    let storage_root =
        test_helpers::create_storage_with_object("uploads", "org1/trades.csv", csv.as_bytes())
            .unwrap();

    let api = ImportApi::new(
        db_path.clone(),
        LocalFileStorage::new(storage_root.path()),
        ImportConfig::default(),
    );
    let summary = api
        .run_import(request("org1", "org1/trades.csv"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.status, JobStatus::Error);
    assert_eq!(summary.total_rows, 3);
    assert_eq!(summary.success_rows, 2);
    assert_eq!(summary.error_rows, 1);

    let errors = api.list_job_errors(&summary.job_id).await.unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error_code, JobErrorCode::ValidationError);
    assert_eq!(errors[0].row_number, 2);
    // Raw input is preserved for inspection.
    assert_eq!(errors[0].raw_data["HS Code"], "620342");
}

#[tokio::test]
async fn test_placeholder_company_name_is_rejected() {
    let (_db_file, db_path) = test_helpers::create_test_db().unwrap();
    let csv = "Company Name,HS Code\n\
               Acme Corp,847130\n\
               Unknown Company,620342\n";
    let storage_root =
        test_helpers::create_storage_with_object("uploads", "org1/trades.csv", csv.as_bytes())
            .unwrap();

    let api = ImportApi::new(
        db_path,
        LocalFileStorage::new(storage_root.path()),
        ImportConfig::default(),
    );
    let summary = api
        .run_import(request("org1", "org1/trades.csv"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.status, JobStatus::Error);
    assert_eq!(summary.success_rows, 1);
    assert_eq!(summary.error_rows, 1);

    let errors = api.list_job_errors(&summary.job_id).await.unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].row_number, 2);
    assert_eq!(errors[0].error_code, JobErrorCode::ValidationError);
}

#[tokio::test]
async fn test_row_numbers_are_stable_across_filtering() {
    let (_db_file, db_path) = test_helpers::create_test_db().unwrap();
    let csv = "Company Name,HS Code\n\
               Acme Corp,1\n\
               ,2\n\
               Beta Trading,3\n\
               ,4\n\
               Gamma Ltd,5\n";
    let storage_root =
        test_helpers::create_storage_with_object("uploads", "org1/trades.csv", csv.as_bytes())
            .unwrap();

    let api = ImportApi::new(
        db_path,
        LocalFileStorage::new(storage_root.path()),
        ImportConfig::default(),
    );
    let summary = api
        .run_import(request("org1", "org1/trades.csv"), &CancellationToken::new())
        .await
        .unwrap();

    let errors = api.list_job_errors(&summary.job_id).await.unwrap();
    let rows: Vec<i64> = errors.iter().map(|e| e.row_number).collect();
    assert_eq!(rows, vec![2, 4]);
}

#[tokio::test]
async fn test_no_valid_rows_ends_in_error_status() {
    let (_db_file, db_path) = test_helpers::create_test_db().unwrap();
    let csv = "Company Name,HS Code\n,1\n,2\n";
    let storage_root =
        test_helpers::create_storage_with_object("uploads", "org1/trades.csv", csv.as_bytes())
            .unwrap();

    let api = ImportApi::new(
        db_path,
        LocalFileStorage::new(storage_root.path()),
        ImportConfig::default(),
    );
    let summary = api
        .run_import(request("org1", "org1/trades.csv"), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.status, JobStatus::Error);
    assert_eq!(summary.success_rows, 0);
    assert_eq!(summary.error_rows, 2);
}

#[tokio::test]
async fn test_unsupported_format_fails_the_job() {
    let (_db_file, db_path) = test_helpers::create_test_db().unwrap();
    let storage_root =
        test_helpers::create_storage_with_object("uploads", "org1/trades.pdf", b"%PDF-1.4")
            .unwrap();

    let api = ImportApi::new(
        db_path,
        LocalFileStorage::new(storage_root.path()),
        ImportConfig::default(),
    );
    let result = api
        .run_import(
            ImportJobRequest {
                job_id: Some("job-pdf".to_string()),
                org_id: "org1".to_string(),
                bucket: "uploads".to_string(),
                object_path: "org1/trades.pdf".to_string(),
            },
            &CancellationToken::new(),
        )
        .await;
    assert!(matches!(result, Err(ApiError::Import(_))));

    let job = api.get_job("job-pdf").await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.finished_at.is_some());

    let errors = api.list_job_errors("job-pdf").await.unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error_code, JobErrorCode::SystemError);
    assert_eq!(errors[0].row_number, 0);
}

#[tokio::test]
async fn test_cancellation_moves_job_to_failed() {
    let (_db_file, db_path) = test_helpers::create_test_db().unwrap();
    let csv = "Company Name\nAcme Corp\n";
    let storage_root =
        test_helpers::create_storage_with_object("uploads", "org1/trades.csv", csv.as_bytes())
            .unwrap();

    let api = ImportApi::new(
        db_path,
        LocalFileStorage::new(storage_root.path()),
        ImportConfig::default(),
    );
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = api
        .run_import(
            ImportJobRequest {
                job_id: Some("job-cancelled".to_string()),
                org_id: "org1".to_string(),
                bucket: "uploads".to_string(),
                object_path: "org1/trades.csv".to_string(),
            },
            &cancel,
        )
        .await;
    assert!(result.is_err());

    let job = api.get_job("job-cancelled").await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
}

#[tokio::test]
async fn test_reimporting_the_same_file_does_not_duplicate() {
    let (_db_file, db_path) = test_helpers::create_test_db().unwrap();
    let csv = "Company Name,B/L Number\n\
               Acme Corp,BOL-1\n\
               Beta Trading,BOL-2\n";
    let storage_root =
        test_helpers::create_storage_with_object("uploads", "org1/trades.csv", csv.as_bytes())
            .unwrap();

    let api = ImportApi::new(
        db_path.clone(),
        LocalFileStorage::new(storage_root.path()),
        ImportConfig::default(),
    );
    for _ in 0..2 {
        let summary = api
            .run_import(request("org1", "org1/trades.csv"), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(summary.status, JobStatus::Success);
    }

    let shipments = ShipmentRepositoryImpl::new(&db_path).unwrap();
    assert_eq!(shipments.count_for_org("org1").await.unwrap(), 2);
}

// ==========================================
// Batch failure resilience
// ==========================================

/// Fails one designated batch and persists nothing. Lets the tests pin
/// down per-batch error accounting without corrupting a real database.
struct FlakyShipmentRepo {
    fail_on_call: usize,
    calls: AtomicUsize,
}

impl FlakyShipmentRepo {
    fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: call,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ShipmentRepository for FlakyShipmentRepo {
    async fn upsert_batch(
        &self,
        _org_id: &str,
        rows: &[(i64, CanonicalRow)],
    ) -> RepoResult<usize> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == self.fail_on_call {
            return Err(RepositoryError::DatabaseQueryError(
                "simulated batch failure".to_string(),
            ));
        }
        Ok(rows.len())
    }

    async fn count_for_org(&self, _org_id: &str) -> RepoResult<i64> {
        Ok(0)
    }
}

#[tokio::test]
async fn test_failed_batch_rejects_its_rows_but_job_continues() {
    let (_db_file, db_path) = test_helpers::create_test_db().unwrap();
    let csv = "Company Name\nA\nB\nC\nD\nE\nF\n";
    let storage_root =
        test_helpers::create_storage_with_object("uploads", "org1/trades.csv", csv.as_bytes())
            .unwrap();

    let job_repo = ImportJobRepositoryImpl::new(&db_path).unwrap();
    let job = trade_import::domain::ImportJob::new(
        "job-flaky".to_string(),
        "org1".to_string(),
        "uploads".to_string(),
        "org1/trades.csv".to_string(),
    );
    job_repo.create_job(&job).await.unwrap();

    // Three batches of two; the second one fails.
    let orchestrator = ImportOrchestrator::new(
        LocalFileStorage::new(storage_root.path()),
        ImportJobRepositoryImpl::new(&db_path).unwrap(),
        FlakyShipmentRepo::failing_on(1),
        ImportConfig {
            batch_size: 2,
            ..ImportConfig::default()
        },
    );
    let summary = orchestrator
        .run_job(&JobRequest::from_job(&job), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.status, JobStatus::Error);
    assert_eq!(summary.total_rows, 6);
    assert_eq!(summary.success_rows, 4);
    assert_eq!(summary.error_rows, 2);

    let errors = job_repo.list_errors("job-flaky").await.unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error_code, JobErrorCode::InsertError);
    // First row of the failed batch.
    assert_eq!(errors[0].row_number, 3);
}

#[tokio::test]
async fn test_system_error_marks_job_failed_without_touching_counters() {
    // The job references an object that does not exist in storage. The
    // failure path must only mark the job failed; counters stay where
    // they were when the error hit.
    let (_db_file, db_path) = test_helpers::create_test_db().unwrap();
    let csv = "Company Name\nAcme Corp\n";
    let storage_root =
        test_helpers::create_storage_with_object("uploads", "org1/x.csv", csv.as_bytes()).unwrap();

    let job_repo = ImportJobRepositoryImpl::new(&db_path).unwrap();
    let job = trade_import::domain::ImportJob::new(
        "job-sys".to_string(),
        "org1".to_string(),
        "uploads".to_string(),
        "org1/missing-after-all.csv".to_string(),
    );
    job_repo.create_job(&job).await.unwrap();

    // Object path in the job does not exist in storage.
    let orchestrator = ImportOrchestrator::new(
        LocalFileStorage::new(storage_root.path()),
        ImportJobRepositoryImpl::new(&db_path).unwrap(),
        ShipmentRepositoryImpl::new(&db_path).unwrap(),
        ImportConfig::default(),
    );
    let result = orchestrator
        .run_job(&JobRequest::from_job(&job), &CancellationToken::new())
        .await;
    assert!(matches!(result, Err(ImportError::Storage(_))));

    let stored = job_repo.get_job("job-sys").await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Failed);
    assert_eq!(stored.success_rows, 0);
    assert_eq!(stored.error_rows, 0);
}

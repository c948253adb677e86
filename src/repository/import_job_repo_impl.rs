// ==========================================
// Trade Import - Import Job Repository (SQLite)
// ==========================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::{ImportJob, ImportJobError, JobErrorCode, JobStatus};
use crate::repository::error::{RepoResult, RepositoryError};
use crate::repository::import_job_repo::ImportJobRepository;

pub struct ImportJobRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ImportJobRepositoryImpl {
    pub fn new(db_path: &str) -> RepoResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> RepoResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

fn parse_timestamp(raw: Option<String>) -> RepoResult<Option<DateTime<Utc>>> {
    raw.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| RepositoryError::InternalError(format!("bad timestamp {s:?}: {e}")))
    })
    .transpose()
}

fn job_from_row(row: &Row<'_>) -> rusqlite::Result<(ImportJob, Option<String>, Option<String>, String)> {
    let status_raw: String = row.get(4)?;
    let status = JobStatus::parse(&status_raw).unwrap_or(JobStatus::Failed);
    let started_at: Option<String> = row.get(8)?;
    let finished_at: Option<String> = row.get(9)?;
    let created_at: String = row.get(10)?;
    Ok((
        ImportJob {
            job_id: row.get(0)?,
            org_id: row.get(1)?,
            bucket: row.get(2)?,
            object_path: row.get(3)?,
            status,
            total_rows: row.get(5)?,
            success_rows: row.get(6)?,
            error_rows: row.get(7)?,
            started_at: None,
            finished_at: None,
            created_at: Utc::now(),
        },
        started_at,
        finished_at,
        created_at,
    ))
}

#[async_trait]
impl ImportJobRepository for ImportJobRepositoryImpl {
    async fn create_job(&self, job: &ImportJob) -> RepoResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO import_job (
                job_id, org_id, bucket, object_path, status,
                total_rows, success_rows, error_rows,
                started_at, finished_at, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                job.job_id,
                job.org_id,
                job.bucket,
                job.object_path,
                job.status.as_str(),
                job.total_rows,
                job.success_rows,
                job.error_rows,
                job.started_at.map(|t| t.to_rfc3339()),
                job.finished_at.map(|t| t.to_rfc3339()),
                job.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    async fn get_job(&self, job_id: &str) -> RepoResult<Option<ImportJob>> {
        let conn = self.lock()?;
        let found = conn
            .query_row(
                r#"
                SELECT job_id, org_id, bucket, object_path, status,
                       total_rows, success_rows, error_rows,
                       started_at, finished_at, created_at
                FROM import_job WHERE job_id = ?1
                "#,
                params![job_id],
                job_from_row,
            )
            .optional()?;

        match found {
            None => Ok(None),
            Some((mut job, started_at, finished_at, created_at)) => {
                job.started_at = parse_timestamp(started_at)?;
                job.finished_at = parse_timestamp(finished_at)?;
                job.created_at = parse_timestamp(Some(created_at))?
                    .unwrap_or_else(Utc::now);
                Ok(Some(job))
            }
        }
    }

    async fn mark_running(&self, job_id: &str, started_at: DateTime<Utc>) -> RepoResult<()> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE import_job SET status = ?1, started_at = ?2 WHERE job_id = ?3",
            params![JobStatus::Running.as_str(), started_at.to_rfc3339(), job_id],
        )?;
        if updated == 0 {
            return Err(RepositoryError::NotFound {
                entity: "import_job".to_string(),
                id: job_id.to_string(),
            });
        }
        Ok(())
    }

    async fn set_total_rows(&self, job_id: &str, total_rows: i64) -> RepoResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "UPDATE import_job SET total_rows = ?1 WHERE job_id = ?2",
            params![total_rows, job_id],
        )?;
        Ok(())
    }

    async fn finish_job(
        &self,
        job_id: &str,
        status: JobStatus,
        success_rows: i64,
        error_rows: i64,
        finished_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            UPDATE import_job
            SET status = ?1, success_rows = ?2, error_rows = ?3, finished_at = ?4
            WHERE job_id = ?5
            "#,
            params![
                status.as_str(),
                success_rows,
                error_rows,
                finished_at.to_rfc3339(),
                job_id
            ],
        )?;
        Ok(())
    }

    async fn mark_failed(&self, job_id: &str, finished_at: DateTime<Utc>) -> RepoResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "UPDATE import_job SET status = ?1, finished_at = ?2 WHERE job_id = ?3",
            params![JobStatus::Failed.as_str(), finished_at.to_rfc3339(), job_id],
        )?;
        Ok(())
    }

    async fn append_error(&self, error: &ImportJobError) -> RepoResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO import_job_error (
                job_id, row_number, raw_data, error_code, error_detail, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                error.job_id,
                error.row_number,
                serde_json::to_string(&error.raw_data)?,
                error.error_code.as_str(),
                error.error_detail,
                error.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    async fn list_errors(&self, job_id: &str) -> RepoResult<Vec<ImportJobError>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT job_id, row_number, raw_data, error_code, error_detail, created_at
            FROM import_job_error
            WHERE job_id = ?1
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map(params![job_id], |row| {
            let raw_data: String = row.get(2)?;
            let error_code: String = row.get(3)?;
            let created_at: String = row.get(5)?;
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                raw_data,
                error_code,
                row.get::<_, String>(4)?,
                created_at,
            ))
        })?;

        let mut errors = Vec::new();
        for row in rows {
            let (job_id, row_number, raw_data, error_code, error_detail, created_at) = row?;
            errors.push(ImportJobError {
                job_id,
                row_number,
                raw_data: serde_json::from_str(&raw_data)?,
                error_code: JobErrorCode::parse(&error_code)
                    .unwrap_or(JobErrorCode::SystemError),
                error_detail,
                created_at: parse_timestamp(Some(created_at))?.unwrap_or_else(Utc::now),
            });
        }
        Ok(errors)
    }
}

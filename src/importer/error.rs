// ==========================================
// Trade Import - Importer Error Types
// ==========================================

use crate::repository::error::RepositoryError;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors raised by the import pipeline. Row- and batch-local problems
/// never surface here; they are captured into the job error log and
/// processing continues. Anything that does surface fails the job.
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File errors =====
    #[error("unsupported file format: {0} (expected .csv/.xlsx/.xls)")]
    UnsupportedFormat(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    #[error("Excel parse failed: {0}")]
    ExcelParseError(String),

    // ===== Collaborator errors =====
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    // ===== Lifecycle errors =====
    #[error("import job not found: {0}")]
    JobNotFound(String),

    #[error("import cancelled")]
    Cancelled,

    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl From<calamine::XlsError> for ImportError {
    fn from(err: calamine::XlsError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result alias for the importer layer.
pub type ImportResult<T> = Result<T, ImportError>;

// ==========================================
// Trade Import - API Error Types
// ==========================================
// Converts lower-layer errors into messages suitable for callers.
// ==========================================

use thiserror::Error;

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("import failed: {0}")]
    Import(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{entity} (id={id})"))
            }
            RepositoryError::InternalError(msg) => ApiError::Internal(msg),
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::JobNotFound(id) => ApiError::NotFound(format!("import_job (id={id})")),
            ImportError::Repository(repo) => repo.into(),
            other => ApiError::Import(other.to_string()),
        }
    }
}

/// Serializable error body for callers that want structured output.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

impl ErrorPayload {
    pub fn from_error(err: &ApiError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Result alias for the API layer.
pub type ApiResult<T> = Result<T, ApiError>;

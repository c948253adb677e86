// ==========================================
// Trade Import - Repository Error Types
// ==========================================
// Repositories do data access only; these errors carry no business
// meaning beyond "the datastore said no".
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("database query failed: {0}")]
    DatabaseQueryError(String),

    #[error("database transaction failed: {0}")]
    DatabaseTransactionError(String),

    #[error("database lock acquisition failed: {0}")]
    LockError(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("internal repository error: {0}")]
    InternalError(String),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        RepositoryError::DatabaseQueryError(err.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::InternalError(format!("serialization failed: {err}"))
    }
}

/// Result alias for the repository layer.
pub type RepoResult<T> = Result<T, RepositoryError>;

// ==========================================
// Trade Import - Core Library
// ==========================================
// Bulk-import pipeline for trade shipment records: header
// reconciliation against a canonical schema, type coercion, and
// batched persistence with a per-job error log.
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities and types
pub mod domain;

// Repository layer - data access
pub mod repository;

// Importer layer - pipeline core
pub mod importer;

// Object storage - source file access
pub mod storage;

// Configuration
pub mod config;

// Database infrastructure (connection setup / unified PRAGMAs)
pub mod db;

// Logging
pub mod logging;

// API layer - caller-facing facade
pub mod api;

// ==========================================
// Core type re-exports
// ==========================================

pub use domain::{
    CanonicalField, CanonicalRow, CanonicalValue, FieldDef, ImportJob, ImportJobError,
    JobErrorCode, JobStatus, RawCellValue, RawKey, RawRow, SemanticType, TargetTable,
};

pub use importer::{
    AliasResolver, CancellationToken, HeaderMapping, HeaderPreview, ImportError,
    ImportOrchestrator, ImportResult, JobRequest, JobSummary,
};

pub use api::{ApiError, ApiResult, ImportApi, ImportJobRequest};

pub use config::ImportConfig;

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "trade-import";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

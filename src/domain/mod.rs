// ==========================================
// Trade Import - Domain Layer
// ==========================================
// Entities and value types shared across the import pipeline.
// ==========================================

pub mod job;
pub mod row;
pub mod schema;

pub use job::{ImportJob, ImportJobError, JobErrorCode, JobStatus};
pub use row::{raw_row_to_json, RawCellValue, RawKey, RawRow};
pub use schema::{
    CanonicalField, CanonicalRow, CanonicalValue, FieldDef, SemanticType, TargetTable,
};

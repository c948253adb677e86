// ==========================================
// Trade Import - API Layer
// ==========================================

pub mod error;
pub mod import_api;

pub use error::{ApiError, ApiResult, ErrorPayload};
pub use import_api::{ImportApi, ImportJobRequest};

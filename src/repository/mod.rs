// ==========================================
// Trade Import - Repository Layer
// ==========================================

pub mod error;
pub mod import_job_repo;
pub mod import_job_repo_impl;
pub mod shipment_repo;
pub mod shipment_repo_impl;

pub use error::{RepoResult, RepositoryError};
pub use import_job_repo::ImportJobRepository;
pub use import_job_repo_impl::ImportJobRepositoryImpl;
pub use shipment_repo::ShipmentRepository;
pub use shipment_repo_impl::{row_identity, ShipmentRepositoryImpl};

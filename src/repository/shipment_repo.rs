// ==========================================
// Trade Import - Shipment Repository Trait
// ==========================================

use async_trait::async_trait;

use crate::domain::CanonicalRow;
use crate::repository::error::RepoResult;

/// Batch persistence for canonicalized shipment rows. Each batch is
/// atomic: either every row in it lands or none do.
#[async_trait]
pub trait ShipmentRepository: Send + Sync {
    /// Upsert one batch. Rows carry their original 1-based row number
    /// for error reporting. Returns the number of rows written.
    async fn upsert_batch(
        &self,
        org_id: &str,
        rows: &[(i64, CanonicalRow)],
    ) -> RepoResult<usize>;

    /// Shipment count for one organization.
    async fn count_for_org(&self, org_id: &str) -> RepoResult<i64>;
}

// ==========================================
// Trade Import - Shipment Repository (SQLite)
// ==========================================
// Batch upserts with a deterministic row identity, so re-importing the
// same file updates existing rows instead of duplicating them.
// ==========================================

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::{CanonicalField, CanonicalRow, CanonicalValue};
use crate::repository::error::{RepoResult, RepositoryError};
use crate::repository::shipment_repo::ShipmentRepository;

pub struct ShipmentRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ShipmentRepositoryImpl {
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

fn text_of(row: &CanonicalRow, field: CanonicalField) -> Option<String> {
    row.get(field)
        .and_then(CanonicalValue::as_text)
        .map(str::to_string)
}

fn number_of(row: &CanonicalRow, field: CanonicalField) -> Option<f64> {
    row.get(field).and_then(CanonicalValue::as_number)
}

fn date_of(row: &CanonicalRow, field: CanonicalField) -> Option<String> {
    row.get(field)
        .and_then(CanonicalValue::as_date)
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Deterministic identity for one shipment row. A bill of lading number
/// identifies the shipment on its own; without one, fall back to the
/// fields that together distinguish real-world records.
pub fn row_identity(org_id: &str, row: &CanonicalRow) -> String {
    if let Some(bol) = text_of(row, CanonicalField::BillOfLadingNumber) {
        return format!("{org_id}|bol|{bol}");
    }
    let part = |v: Option<String>| v.unwrap_or_default();
    format!(
        "{org_id}|{}|{}|{}|{}|{}",
        part(text_of(row, CanonicalField::UnifiedCompanyName)),
        part(text_of(row, CanonicalField::HsCode)),
        part(date_of(row, CanonicalField::UnifiedDate)),
        part(number_of(row, CanonicalField::ValueUsd).map(|n| n.to_string())),
        part(number_of(row, CanonicalField::GrossWeightKg).map(|n| n.to_string())),
    )
}

#[async_trait]
impl ShipmentRepository for ShipmentRepositoryImpl {
    async fn upsert_batch(
        &self,
        org_id: &str,
        rows: &[(i64, CanonicalRow)],
    ) -> RepoResult<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let now = Utc::now().to_rfc3339();
        {
            let mut stmt = tx.prepare_cached(
                r#"
                INSERT INTO shipments (
                    row_key, org_id,
                    unified_company_name, shipper_name, consignee_name,
                    origin_country, destination_country, hs_code, description,
                    gross_weight_kg, value_usd, unified_date, mode,
                    quantity, container_count, vessel_name, bill_of_lading_number,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)
                ON CONFLICT(row_key) DO UPDATE SET
                    unified_company_name  = excluded.unified_company_name,
                    shipper_name          = excluded.shipper_name,
                    consignee_name        = excluded.consignee_name,
                    origin_country        = excluded.origin_country,
                    destination_country   = excluded.destination_country,
                    hs_code               = excluded.hs_code,
                    description           = excluded.description,
                    gross_weight_kg       = excluded.gross_weight_kg,
                    value_usd             = excluded.value_usd,
                    unified_date          = excluded.unified_date,
                    mode                  = excluded.mode,
                    quantity              = excluded.quantity,
                    container_count       = excluded.container_count,
                    vessel_name           = excluded.vessel_name,
                    bill_of_lading_number = excluded.bill_of_lading_number,
                    updated_at            = excluded.updated_at
                "#,
            )?;

            for (_, row) in rows {
                let company = row.company_name().ok_or_else(|| {
                    RepositoryError::InternalError(
                        "shipment row missing company name".to_string(),
                    )
                })?;
                stmt.execute(params![
                    row_identity(org_id, row),
                    org_id,
                    company,
                    text_of(row, CanonicalField::ShipperName),
                    text_of(row, CanonicalField::ConsigneeName),
                    text_of(row, CanonicalField::OriginCountry),
                    text_of(row, CanonicalField::DestinationCountry),
                    text_of(row, CanonicalField::HsCode),
                    text_of(row, CanonicalField::Description),
                    number_of(row, CanonicalField::GrossWeightKg),
                    number_of(row, CanonicalField::ValueUsd),
                    date_of(row, CanonicalField::UnifiedDate),
                    text_of(row, CanonicalField::Mode),
                    number_of(row, CanonicalField::Quantity),
                    number_of(row, CanonicalField::ContainerCount),
                    text_of(row, CanonicalField::VesselName),
                    text_of(row, CanonicalField::BillOfLadingNumber),
                    now,
                    now,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(rows.len())
    }

    async fn count_for_org(&self, org_id: &str) -> RepoResult<i64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM shipments WHERE org_id = ?1",
            params![org_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(company: &str, bol: Option<&str>) -> CanonicalRow {
        let mut row = CanonicalRow::new();
        row.insert(
            CanonicalField::UnifiedCompanyName,
            CanonicalValue::Text(company.to_string()),
        );
        row.insert(CanonicalField::ValueUsd, CanonicalValue::Number(1250.0));
        if let Some(bol) = bol {
            row.insert(
                CanonicalField::BillOfLadingNumber,
                CanonicalValue::Text(bol.to_string()),
            );
        }
        row
    }

    #[test]
    fn test_identity_prefers_bill_of_lading() {
        let row = sample_row("Acme Corp", Some("BOL-123"));
        assert_eq!(row_identity("org1", &row), "org1|bol|BOL-123");
    }

    #[test]
    fn test_identity_composite_without_bill_of_lading() {
        let a = sample_row("Acme Corp", None);
        let b = sample_row("Acme Corp", None);
        let c = sample_row("Other Corp", None);
        assert_eq!(row_identity("org1", &a), row_identity("org1", &b));
        assert_ne!(row_identity("org1", &a), row_identity("org1", &c));
        assert_ne!(row_identity("org1", &a), row_identity("org2", &a));
    }

    #[tokio::test]
    async fn test_upsert_batch_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("shipments.db");
        let repo = ShipmentRepositoryImpl::new(db_path.to_str().unwrap()).unwrap();

        let rows = vec![
            (1, sample_row("Acme Corp", Some("BOL-1"))),
            (2, sample_row("Other Corp", Some("BOL-2"))),
        ];
        assert_eq!(repo.upsert_batch("org1", &rows).await.unwrap(), 2);
        assert_eq!(repo.upsert_batch("org1", &rows).await.unwrap(), 2);
        assert_eq!(repo.count_for_org("org1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("shipments.db");
        let repo = ShipmentRepositoryImpl::new(db_path.to_str().unwrap()).unwrap();
        assert_eq!(repo.upsert_batch("org1", &[]).await.unwrap(), 0);
    }
}

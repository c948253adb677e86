// ==========================================
// Trade Import - SQLite Infrastructure
// ==========================================
// Unified connection setup so every module gets the same PRAGMA
// behavior, plus idempotent schema initialization for the three
// import tables.
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// Default busy_timeout (milliseconds). Independent jobs may write to
/// the same database file concurrently.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// foreign_keys and busy_timeout are per-connection settings.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a connection with unified configuration applied.
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Create the import tables if they do not exist yet.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS import_job (
            job_id        TEXT PRIMARY KEY,
            org_id        TEXT NOT NULL,
            bucket        TEXT NOT NULL,
            object_path   TEXT NOT NULL,
            status        TEXT NOT NULL,
            total_rows    INTEGER,
            success_rows  INTEGER NOT NULL DEFAULT 0,
            error_rows    INTEGER NOT NULL DEFAULT 0,
            started_at    TEXT,
            finished_at   TEXT,
            created_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS import_job_error (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            job_id        TEXT NOT NULL REFERENCES import_job(job_id),
            row_number    INTEGER NOT NULL,
            raw_data      TEXT NOT NULL,
            error_code    TEXT NOT NULL,
            error_detail  TEXT NOT NULL,
            created_at    TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_import_job_error_job
            ON import_job_error(job_id);

        CREATE TABLE IF NOT EXISTS shipments (
            row_key               TEXT PRIMARY KEY,
            org_id                TEXT NOT NULL,
            unified_company_name  TEXT NOT NULL,
            shipper_name          TEXT,
            consignee_name        TEXT,
            origin_country        TEXT,
            destination_country   TEXT,
            hs_code               TEXT,
            description           TEXT,
            gross_weight_kg       REAL,
            value_usd             REAL,
            unified_date          TEXT,
            mode                  TEXT,
            quantity              REAL,
            container_count       REAL,
            vessel_name           TEXT,
            bill_of_lading_number TEXT,
            created_at            TEXT NOT NULL,
            updated_at            TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_shipments_org
            ON shipments(org_id);
        CREATE INDEX IF NOT EXISTS idx_shipments_org_company
            ON shipments(org_id, unified_company_name);
        "#,
    )
}

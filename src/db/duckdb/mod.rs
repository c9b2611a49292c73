//! DuckDB database module for scraped stock data

pub mod models;
mod migrations;

use super::RecordSink;
use crate::config::validate_identifier;
use crate::error::Result;
use crate::scrape::types::StockRecord;
use async_trait::async_trait;
use duckdb::Connection;
use models::StockRow;
use parking_lot::Mutex;
use std::path::Path;

/// Fully qualified stock table
#[derive(Debug, Clone)]
pub struct TableRef {
    pub catalog: String,
    pub schema: String,
    pub table: String,
}

impl TableRef {
    pub fn qualified_schema(&self) -> String {
        format!("{}.{}", quote(&self.catalog), quote(&self.schema))
    }

    pub fn qualified(&self) -> String {
        format!("{}.{}", self.qualified_schema(), quote(&self.table))
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// DuckDB database wrapper
pub struct StockDb {
    conn: Mutex<Connection>,
    table: TableRef,
}

impl StockDb {
    /// Open (or create) the database file
    pub fn new(path: &Path, schema: &str, table: &str) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::with_connection(conn, schema, table)
    }

    /// In-memory database, mostly for tests
    pub fn open_in_memory(schema: &str, table: &str) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, schema, table)
    }

    fn with_connection(conn: Connection, schema: &str, table: &str) -> Result<Self> {
        validate_identifier(schema)?;
        validate_identifier(table)?;

        // Two-part names are ambiguous when the schema matches the file name
        let catalog: String = conn.query_row("SELECT current_database()", [], |row| row.get(0))?;

        let db = Self {
            conn: Mutex::new(conn),
            table: TableRef {
                catalog,
                schema: schema.to_string(),
                table: table.to_string(),
            },
        };

        // Run migrations
        db.run_migrations()?;

        Ok(db)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock();
        migrations::run_migrations(&conn, &self.table)
    }

    /// Insert a record, or update the row with the same ISIN
    pub fn upsert_stock(&self, record: &StockRecord) -> Result<()> {
        let conn = self.conn.lock();

        let sql = format!(
            "INSERT INTO {} (isin, name, label, pe_ratio, div_yield, scraped_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT (isin) DO UPDATE SET
               name = excluded.name, label = excluded.label, pe_ratio = excluded.pe_ratio,
               div_yield = excluded.div_yield, scraped_at = excluded.scraped_at",
            self.table.qualified()
        );

        conn.execute(
            &sql,
            duckdb::params![
                record.isin,
                record.name,
                record.label,
                record.pe_ratio,
                record.div_yield,
                record.scraped_at_string(),
            ],
        )?;

        Ok(())
    }

    /// Get a stored row by ISIN
    pub fn get_stock(&self, isin: &str) -> Result<Option<StockRow>> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare(&format!(
            "SELECT isin, name, label, pe_ratio, div_yield, CAST(scraped_at AS VARCHAR)
             FROM {} WHERE isin = ?",
            self.table.qualified()
        ))?;

        let mut rows = stmt
            .query_map([isin], |row| {
                Ok(StockRow {
                    isin: row.get(0)?,
                    name: row.get(1)?,
                    label: row.get(2)?,
                    pe_ratio: row.get(3)?,
                    div_yield: row.get(4)?,
                    scraped_at: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows.pop())
    }

    /// Number of stored rows
    pub fn count_stocks(&self) -> Result<i64> {
        let conn = self.conn.lock();
        let count = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", self.table.qualified()),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[async_trait]
impl RecordSink for StockDb {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    async fn upsert(&self, record: &StockRecord) -> Result<()> {
        self.upsert_stock(record)?;
        tracing::info!("Upserted data for ISIN: {}", record.isin);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn sample_record() -> StockRecord {
        StockRecord {
            label: "TEST".to_string(),
            name: "Test Company".to_string(),
            isin: "TEST12345678".to_string(),
            div_yield: 2.5,
            pe_ratio: 15.75,
            scraped_at: Utc.with_ymd_and_hms(2023, 11, 5, 15, 21, 4).unwrap(),
        }
    }

    #[test]
    fn test_upsert_inserts_row() {
        let db = StockDb::open_in_memory("stocks", "stock_data").unwrap();
        db.upsert_stock(&sample_record()).unwrap();

        let row = db.get_stock("TEST12345678").unwrap().unwrap();
        assert_eq!(row.name, "Test Company");
        assert_eq!(row.label, "TEST");
        assert_eq!(row.pe_ratio, 15.75);
        assert_eq!(row.div_yield, 2.5);
        assert_eq!(row.scraped_at, "2023-11-05 15:21:04");
        assert_eq!(db.count_stocks().unwrap(), 1);
    }

    #[test]
    fn test_upsert_updates_existing_isin() {
        let db = StockDb::open_in_memory("stocks", "stock_data").unwrap();
        db.upsert_stock(&sample_record()).unwrap();

        let mut updated = sample_record();
        updated.name = "Renamed Company".to_string();
        updated.pe_ratio = 0.0;
        db.upsert_stock(&updated).unwrap();

        assert_eq!(db.count_stocks().unwrap(), 1);
        let row = db.get_stock("TEST12345678").unwrap().unwrap();
        assert_eq!(row.name, "Renamed Company");
        assert_eq!(row.pe_ratio, 0.0);
    }

    #[test]
    fn test_values_are_bound_not_spliced() {
        let db = StockDb::open_in_memory("stocks", "stock_data").unwrap();
        let mut record = sample_record();
        record.name = "O'Reilly'); DROP TABLE stock_data; --".to_string();
        db.upsert_stock(&record).unwrap();

        let row = db.get_stock("TEST12345678").unwrap().unwrap();
        assert_eq!(row.name, record.name);
        assert_eq!(db.count_stocks().unwrap(), 1);
    }

    #[test]
    fn test_missing_isin_returns_none() {
        let db = StockDb::open_in_memory("stocks", "stock_data").unwrap();
        assert!(db.get_stock("NOPE").unwrap().is_none());
    }

    #[test]
    fn test_invalid_identifiers_rejected() {
        assert!(StockDb::open_in_memory("stocks", "bad name").is_err());
        assert!(StockDb::open_in_memory("1schema", "stock_data").is_err());
    }

    #[test]
    fn test_file_database_persists_and_reopens() {
        let dir = tempdir().unwrap();
        // schema deliberately shares the file stem
        let path = dir.path().join("nested").join("stocks.duckdb");

        {
            let db = StockDb::new(&path, "stocks", "stock_data").unwrap();
            db.upsert_stock(&sample_record()).unwrap();
        }

        let db = StockDb::new(&path, "stocks", "stock_data").unwrap();
        assert_eq!(db.count_stocks().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_record_sink_upsert() {
        let db = StockDb::open_in_memory("stocks", "stock_data").unwrap();
        let sink: &dyn RecordSink = &db;
        sink.upsert(&sample_record()).await.unwrap();
        assert_eq!(sink.name(), "duckdb");
        assert_eq!(db.count_stocks().unwrap(), 1);
    }
}

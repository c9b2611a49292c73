//! Warehouse sinks
//!
//! - `duckdb` - local analytical store
//! - `bigquery` - BigQuery table through the REST query API

pub mod duckdb;
pub mod bigquery;

use crate::error::Result;
use crate::scrape::types::StockRecord;
use async_trait::async_trait;

/// Insert-or-update of stock records keyed on ISIN
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Sink name for log lines
    fn name(&self) -> &'static str;

    async fn upsert(&self, record: &StockRecord) -> Result<()>;
}

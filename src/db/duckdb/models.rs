//! DuckDB data models

use serde::{Deserialize, Serialize};

/// Stored stock row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRow {
    pub isin: String,
    pub name: String,
    pub label: String,
    pub pe_ratio: f64,
    pub div_yield: f64,
    pub scraped_at: String,
}

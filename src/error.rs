//! Application error types

use serde::Serialize;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to fetch page for {symbol}: HTTP status {status}")]
    FetchStatus { symbol: String, status: u16 },

    #[error("Page structure error: {0}")]
    Structure(String),

    #[error("Warehouse error: {0}")]
    Warehouse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Short machine-readable code, used in structured log fields
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DuckDb(_) => "DUCKDB_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Http(_) => "HTTP_ERROR",
            AppError::Csv(_) => "CSV_ERROR",
            AppError::FetchStatus { .. } => "FETCH_STATUS",
            AppError::Structure(_) => "STRUCTURE_ERROR",
            AppError::Warehouse(_) => "WAREHOUSE_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Io(_) => "IO_ERROR",
        }
    }

    /// Whether this error came from fetching the page (transport or status)
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, AppError::Http(_) | AppError::FetchStatus { .. })
    }
}

/// Serializable error report, written into the batch summary
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        ErrorResponse {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

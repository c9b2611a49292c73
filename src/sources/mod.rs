//! Symbol list sources
//!
//! The list is a headerless two-column CSV (display name, symbol) kept
//! either on local disk or in a Cloud Storage bucket.

pub mod local;
pub mod gcs;

use crate::error::Result;
use async_trait::async_trait;

pub use gcs::GcsSource;
pub use local::LocalFileSource;

/// Provides the raw bytes of the symbol list
#[async_trait]
pub trait SymbolSource: Send + Sync {
    /// Human-readable location for log lines
    fn location(&self) -> String;

    /// Raw CSV bytes; `AppError::NotFound` when the list does not exist
    async fn fetch_symbol_list(&self) -> Result<Vec<u8>>;
}

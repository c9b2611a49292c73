//! Application state management

use crate::config::{Config, Environment};
use crate::db::bigquery::BigQuerySink;
use crate::db::duckdb::StockDb;
use crate::db::RecordSink;
use crate::error::Result;
use crate::scrape::{FaceplateParser, HttpPageFetcher, PageFetcher, PageParser};
use crate::sources::{GcsSource, LocalFileSource, SymbolSource};
use std::sync::Arc;

/// Collaborators shared by the services
pub struct AppState {
    /// Stock page fetcher
    pub fetcher: Arc<dyn PageFetcher>,

    /// Stock page parser
    pub parser: Arc<dyn PageParser>,

    /// Symbol list source
    pub source: Arc<dyn SymbolSource>,

    /// Record sink
    pub sink: Arc<dyn RecordSink>,
}

impl AppState {
    /// Wire collaborators for the configured environment
    pub fn from_config(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpPageFetcher::new(&config.scraper)?);
        let parser: Arc<dyn PageParser> = Arc::new(FaceplateParser::new());

        let source: Arc<dyn SymbolSource>;
        let sink: Arc<dyn RecordSink>;

        match config.environment {
            Environment::Local => {
                tracing::info!("DuckDB path: {:?}", config.warehouse.duckdb_path);
                source = Arc::new(LocalFileSource::new(config.storage.local_csv_path.clone()));
                sink = Arc::new(StockDb::new(
                    &config.warehouse.duckdb_path,
                    &config.warehouse.dataset,
                    &config.warehouse.table,
                )?);
            }
            Environment::Cloud => {
                source = Arc::new(GcsSource::from_config(&config)?);
                sink = Arc::new(BigQuerySink::from_config(&config)?);
            }
        }

        Ok(Self::new(fetcher, parser, source, sink))
    }

    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        parser: Arc<dyn PageParser>,
        source: Arc<dyn SymbolSource>,
        sink: Arc<dyn RecordSink>,
    ) -> Self {
        Self {
            fetcher,
            parser,
            source,
            sink,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_local_state_wiring() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("warehouse.duckdb");
        let csv_path = dir.path().join("stocks.csv");
        let db_value = db_path.display().to_string();
        let csv_value = csv_path.display().to_string();

        let config = Config::from_lookup(|key| match key {
            "DUCKDB_PATH" => Some(db_value.clone()),
            "LOCAL_CSV_PATH" => Some(csv_value.clone()),
            _ => None,
        })
        .unwrap();

        let state = AppState::from_config(config).unwrap();
        assert_eq!(state.sink.name(), "duckdb");
        assert_eq!(state.source.location(), csv_value);
        assert!(db_path.exists());
    }

    #[test]
    fn test_cloud_state_wiring() {
        let config = Config::from_lookup(|key| match key {
            "APP_ENV" => Some("cloud".to_string()),
            "GCP_PROJECT" => Some("test-project".to_string()),
            "GCS_BUCKET" => Some("test-bucket".to_string()),
            _ => None,
        })
        .unwrap();

        let state = AppState::from_config(config).unwrap();
        assert_eq!(state.sink.name(), "bigquery");
        assert_eq!(state.source.location(), "gs://test-bucket/stocks.csv");
    }
}

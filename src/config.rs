//! Runtime configuration
//!
//! Loaded from environment variables (a `.env` file is honoured in
//! development). `APP_ENV` selects where the symbol list comes from and
//! where records are written.

use crate::error::{AppError, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const DEFAULT_SCRAPER_BASE_URL: &str = "https://www.boursorama.com/cours";
const DEFAULT_GCS_BASE_URL: &str = "https://storage.googleapis.com";
const DEFAULT_BIGQUERY_BASE_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Data source/sink locations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Local CSV file and DuckDB warehouse
    Local,
    /// Cloud Storage object and BigQuery table
    Cloud,
}

impl Environment {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "cloud" => Ok(Environment::Cloud),
            other => Err(AppError::Config(format!(
                "APP_ENV must be 'local' or 'cloud', got '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "local"),
            Environment::Cloud => write!(f, "cloud"),
        }
    }
}

/// Target table identity (dataset/schema + table)
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    pub dataset: String,
    pub table: String,
    pub duckdb_path: PathBuf,
    pub bigquery_base_url: String,
}

/// Symbol list location
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: Option<String>,
    pub object_key: String,
    pub local_csv_path: PathBuf,
    pub gcs_base_url: String,
}

/// Page fetch settings
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub project: Option<String>,
    pub warehouse: WarehouseConfig,
    pub storage: StorageConfig,
    pub scraper: ScraperConfig,
    pub access_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match var("APP_ENV") {
            Some(value) => Environment::parse(&value)?,
            None => Environment::Local,
        };

        let timeout_secs = match var("SCRAPER_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!(
                    "SCRAPER_TIMEOUT_SECS must be a positive integer, got '{}'",
                    value
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "SCRAPER_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        let config = Self {
            environment,
            project: var("GCP_PROJECT"),
            warehouse: WarehouseConfig {
                dataset: var("BQ_DATASET").unwrap_or_else(|| "stocks".to_string()),
                table: var("BQ_TABLE").unwrap_or_else(|| "stock_data".to_string()),
                duckdb_path: var("DUCKDB_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("data/stocks.duckdb")),
                bigquery_base_url: base_url(var("BIGQUERY_BASE_URL"), DEFAULT_BIGQUERY_BASE_URL)?,
            },
            storage: StorageConfig {
                bucket: var("GCS_BUCKET"),
                object_key: var("GCS_CSV_FILE").unwrap_or_else(|| "stocks.csv".to_string()),
                local_csv_path: var("LOCAL_CSV_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("data/stocks.csv")),
                gcs_base_url: base_url(var("GCS_BASE_URL"), DEFAULT_GCS_BASE_URL)?,
            },
            scraper: ScraperConfig {
                base_url: base_url(var("SCRAPER_BASE_URL"), DEFAULT_SCRAPER_BASE_URL)?,
                timeout: Duration::from_secs(timeout_secs),
            },
            access_token: var("GOOGLE_OAUTH_ACCESS_TOKEN"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that the keys required by the selected environment are present
    pub fn validate(&self) -> Result<()> {
        validate_identifier(&self.warehouse.dataset)?;
        validate_identifier(&self.warehouse.table)?;

        if self.environment == Environment::Cloud {
            let project = self
                .project
                .as_deref()
                .ok_or_else(|| {
                    AppError::Config("GCP_PROJECT must be set in cloud mode".to_string())
                })?;
            validate_project_id(project)?;

            if self.storage.bucket.is_none() {
                return Err(AppError::Config("GCS_BUCKET must be set in cloud mode".to_string()));
            }
        }

        Ok(())
    }
}

/// Parse a base URL and drop any trailing slash
fn base_url(value: Option<String>, default: &str) -> Result<String> {
    let raw = value.unwrap_or_else(|| default.to_string());
    let parsed = Url::parse(raw.trim())
        .map_err(|e| AppError::Config(format!("Invalid URL '{}': {}", raw, e)))?;
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

/// Dataset, schema and table names are spliced into SQL, so only plain
/// identifiers are accepted.
pub fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(AppError::Config(format!("Invalid identifier: '{}'", name)))
    }
}

/// GCP project ids: lowercase letters, digits and hyphens
pub fn validate_project_id(project: &str) -> Result<()> {
    let valid = !project.is_empty()
        && project
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !project.starts_with('-')
        && !project.ends_with('-');

    if valid {
        Ok(())
    } else {
        Err(AppError::Config(format!("Invalid project id: '{}'", project)))
    }
}

//! Stock Scraper
//!
//! Scrapes company name, ISIN, dividend yield and PE ratio from Boursorama
//! stock pages and upserts them into an analytical warehouse (BigQuery in the
//! cloud, DuckDB locally).

pub mod config;
pub mod db;
pub mod error;
pub mod scrape;
pub mod services;
pub mod sources;
pub mod state;

#[cfg(test)]
mod testing;

use config::Config;
use error::Result;
use services::{BatchService, BatchSummary};
use state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
pub fn init_tracing() {
    // try_init: a subscriber may already be installed by the host
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stock_scraper_lib=info,stock_scraper=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Run one batch with configuration from the environment
pub async fn run() -> Result<BatchSummary> {
    init_tracing();

    tracing::info!("Starting Stock Scraper...");

    let config = Config::from_env()?;
    tracing::info!("Running in {} environment", config.environment);

    let state = AppState::from_config(config)?;
    BatchService::run(&state).await
}

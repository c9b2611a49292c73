//! Extraction Service
//!
//! Fetches a stock page, parses it and assembles the `StockRecord`.

use crate::error::{AppError, Result};
use crate::scrape::normalize::normalize;
use crate::scrape::pairing::pair_headings;
use crate::scrape::types::{Extraction, FaceplatePage, Metric, StockRecord};
use crate::state::AppState;
use chrono::Utc;
use tracing::{error, info, warn};

/// Extraction service for business logic
pub struct ExtractionService;

impl ExtractionService {
    /// Scrape one symbol. A single fetch attempt, no retries.
    pub async fn extract(state: &AppState, symbol: &str) -> Result<Extraction> {
        let html = match state.fetcher.fetch(symbol).await {
            Ok(html) => html,
            Err(e) => {
                error!("Failed to fetch page for {}: {}", symbol, e);
                return Err(e);
            }
        };

        state
            .parser
            .parse(&html)
            .and_then(|page| Self::assemble(symbol, page))
            .map_err(|e| {
                error!("Data extraction error for {}: {}", symbol, e);
                e
            })
    }

    /// Build the record from a parsed page
    pub fn assemble(symbol: &str, page: FaceplatePage) -> Result<Extraction> {
        let name = page
            .company_name
            .ok_or_else(|| missing_anchor(symbol, "company name"))?;
        let isin = page.isin.ok_or_else(|| missing_anchor(symbol, "ISIN"))?;
        let nodes = page
            .metric_nodes
            .ok_or_else(|| missing_anchor(symbol, "metrics container"))?;

        let mut div_yield = None;
        let mut pe_ratio = None;

        // the last matching heading wins
        for (heading, text) in &pair_headings(&nodes) {
            match Metric::from_heading(heading) {
                Some(Metric::DividendYield) => div_yield = normalize(Some(text.as_str())),
                Some(Metric::PeRatio) => pe_ratio = normalize(Some(text.as_str())),
                None => {}
            }
        }

        let mut missing = Vec::new();
        let div_yield = or_default(div_yield, Metric::DividendYield, symbol, &mut missing);
        let pe_ratio = or_default(pe_ratio, Metric::PeRatio, symbol, &mut missing);

        if missing.is_empty() {
            info!("Successfully scraped data for {}", symbol);
        } else {
            info!("Partially scraped data for {}", symbol);
        }

        Ok(Extraction {
            record: StockRecord {
                label: symbol.to_string(),
                name,
                isin,
                div_yield,
                pe_ratio,
                scraped_at: Utc::now(),
            },
            missing,
        })
    }
}

fn missing_anchor(symbol: &str, anchor: &str) -> AppError {
    AppError::Structure(format!("{} not found on page for {}", anchor, symbol))
}

fn or_default(value: Option<f64>, metric: Metric, symbol: &str, missing: &mut Vec<Metric>) -> f64 {
    match value {
        Some(v) => v,
        None => {
            warn!("{} not found for {}", metric.label(), symbol);
            missing.push(metric);
            0.0
        }
    }
}

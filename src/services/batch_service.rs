//! Batch Service
//!
//! Runs the scrape-and-store pipeline over every symbol in the list.
//! A failing symbol is logged and counted, the run moves on.

use crate::error::{AppError, ErrorResponse, Result};
use crate::services::{ExtractionService, SymbolService};
use crate::state::AppState;
use serde::Serialize;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// Pipeline stage where a symbol failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    Fetch,
    Parse,
    Upsert,
}

impl FailureStage {
    fn of_extraction(err: &AppError) -> Self {
        if err.is_fetch_failure() {
            FailureStage::Fetch
        } else {
            FailureStage::Parse
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SymbolFailure {
    pub symbol: String,
    pub stage: FailureStage,
    pub error: ErrorResponse,
}

/// Outcome of one batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub run_id: String,
    pub total: usize,
    pub complete: usize,
    pub partial: usize,
    pub failed: usize,
    pub sink_failures: usize,
    pub failures: Vec<SymbolFailure>,
}

impl BatchSummary {
    fn new(run_id: String, total: usize) -> Self {
        Self {
            run_id,
            total,
            complete: 0,
            partial: 0,
            failed: 0,
            sink_failures: 0,
            failures: Vec::new(),
        }
    }

    /// Records that reached the sink
    pub fn stored(&self) -> usize {
        self.complete + self.partial - self.sink_failures
    }
}

/// Batch service for business logic
pub struct BatchService;

impl BatchService {
    /// Load the symbol list and process it. Only a symbol list failure aborts.
    pub async fn run(state: &AppState) -> Result<BatchSummary> {
        let symbols = SymbolService::load_symbols(state).await?;
        Ok(Self::process_symbols(state, &symbols).await)
    }

    /// Process symbols sequentially, in list order
    pub async fn process_symbols(state: &AppState, symbols: &[String]) -> BatchSummary {
        let run_id = Uuid::new_v4().to_string();
        let mut summary = BatchSummary::new(run_id.clone(), symbols.len());

        info!(
            "Starting batch {} with {} symbols into {}",
            run_id,
            symbols.len(),
            state.sink.name()
        );

        for symbol in symbols {
            let span = info_span!("symbol", run_id = %run_id, symbol = %symbol);
            Self::process_symbol(state, symbol, &mut summary)
                .instrument(span)
                .await;
        }

        info!(
            "Batch {} finished: {} complete, {} partial, {} failed, {} sink failures",
            summary.run_id, summary.complete, summary.partial, summary.failed, summary.sink_failures
        );

        summary
    }

    async fn process_symbol(state: &AppState, symbol: &str, summary: &mut BatchSummary) {
        let extraction = match ExtractionService::extract(state, symbol).await {
            Ok(extraction) => extraction,
            Err(e) => {
                summary.failed += 1;
                summary.failures.push(SymbolFailure {
                    symbol: symbol.to_string(),
                    stage: FailureStage::of_extraction(&e),
                    error: ErrorResponse::from(&e),
                });
                return;
            }
        };

        if extraction.is_complete() {
            summary.complete += 1;
        } else {
            summary.partial += 1;
        }

        if let Err(e) = state.sink.upsert(&extraction.record).await {
            error!(
                "Failed to upsert data for {} into {}: {}",
                extraction.record.isin,
                state.sink.name(),
                e
            );
            summary.sink_failures += 1;
            summary.failures.push(SymbolFailure {
                symbol: symbol.to_string(),
                stage: FailureStage::Upsert,
                error: ErrorResponse::from(&e),
            });
        }
    }
}

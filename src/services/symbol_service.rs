//! Symbol Service
//!
//! Loads the list of symbols to scrape.

use crate::error::Result;
use crate::state::AppState;
use tracing::{info, warn};

/// Symbol service for business logic
pub struct SymbolService;

impl SymbolService {
    /// Download and decode the configured symbol list
    pub async fn load_symbols(state: &AppState) -> Result<Vec<String>> {
        let location = state.source.location();
        info!("SymbolService::load_symbols - {}", location);

        let data = state.source.fetch_symbol_list().await?;
        let symbols = Self::read_symbols(&data)?;

        info!("Loaded {} symbols from {}", symbols.len(), location);
        Ok(symbols)
    }

    /// Decode a headerless `display name,symbol` CSV
    pub fn read_symbols(data: &[u8]) -> Result<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(data);

        let mut symbols = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;

            // Skip empty rows
            if record.iter().all(str::is_empty) {
                continue;
            }

            match record.get(1).filter(|symbol| !symbol.is_empty()) {
                Some(symbol) => symbols.push(symbol.to_string()),
                None => warn!("Skipping row {} without a symbol: {:?}", index + 1, record),
            }
        }

        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::testing::{test_state, CountingParser, FakeFetcher, FakeSource, RecordingSink};
    use std::sync::Arc;

    #[test]
    fn test_read_symbols() {
        let symbols = SymbolService::read_symbols(b"Test Company,1rPTC\n").unwrap();
        assert_eq!(symbols, vec!["1rPTC"]);
    }

    #[test]
    fn test_read_symbols_skips_empty_and_short_rows() {
        let data: &[u8] = b"Air Liquide,1rPAI\n\n  ,  \nOrphan\n\
            Total Energies , 1rPTTE \r\nExtra Columns, 1rPX,extra\n";
        let symbols = SymbolService::read_symbols(data).unwrap();
        assert_eq!(symbols, vec!["1rPAI", "1rPTTE", "1rPX"]);
    }

    #[test]
    fn test_read_symbols_rejects_invalid_utf8() {
        let result = SymbolService::read_symbols(b"Bad \xff\xfe,1rPX\n");
        assert!(matches!(result, Err(AppError::Csv(_))));
    }

    #[tokio::test]
    async fn test_load_symbols_from_source() {
        let state = test_state(
            FakeFetcher::default(),
            Arc::new(CountingParser::default()),
            FakeSource::new("A,1rPA\nB,1rPB\n"),
            Arc::new(RecordingSink::default()),
        );
        assert_eq!(SymbolService::load_symbols(&state).await.unwrap(), vec!["1rPA", "1rPB"]);
    }

    #[tokio::test]
    async fn test_load_symbols_missing_list() {
        let state = test_state(
            FakeFetcher::default(),
            Arc::new(CountingParser::default()),
            FakeSource::missing(),
            Arc::new(RecordingSink::default()),
        );
        let err = SymbolService::load_symbols(&state).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}

//! Fake collaborators for unit tests

use crate::db::RecordSink;
use crate::error::{AppError, Result};
use crate::scrape::types::{FaceplatePage, StockRecord};
use crate::scrape::{FaceplateParser, PageFetcher, PageParser};
use crate::sources::SymbolSource;
use crate::state::AppState;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const SAMPLE_HTML: &str = r#"
    <html>
    <head><title>Test Stock Page</title></head>
    <body>
        <a class="c-faceplate__company-link">Test Company</a>
        <h2 class="c-faceplate__isin">FR1234567890</h2>
        <div class="c-faceplate__data">
            <p class="c-list-info__heading u-color-neutral">
                rendement estimé 2024
            </p>
            <p class="c-list-info__value u-color-big-stone">
                2,50%
            </p>
            <p class="c-list-info__heading u-color-neutral">
                PER estimé 2024
            </p>
            <p class="c-list-info__value u-color-big-stone">
                15,75
            </p>
        </div>
    </body>
    </html>
"#;

pub const NO_METRICS_HTML: &str = r#"
    <a class="c-faceplate__company-link">Test Company</a>
    <h2 class="c-faceplate__isin">FR1234567890</h2>
    <div class="c-faceplate__data">
        <p class="c-list-info__heading">capitalisation</p>
        <p class="c-list-info__value">1,2 Md</p>
    </div>
"#;

/// Page with the given name and ISIN and both metrics
pub fn stock_page(name: &str, isin: &str) -> String {
    format!(
        r#"<a class="c-faceplate__company-link">{}</a>
           <h2 class="c-faceplate__isin">{}</h2>
           <div class="c-faceplate__data">
               <p class="c-list-info__heading">rendement estimé 2024</p>
               <p class="c-list-info__value">3,10%</p>
               <p class="c-list-info__heading">PER estimé 2024</p>
               <p class="c-list-info__value">11,20</p>
           </div>"#,
        name, isin
    )
}

/// Serves canned pages per symbol; unknown symbols get a 404
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, std::result::Result<String, u16>>,
}

impl FakeFetcher {
    pub fn with_page(mut self, symbol: &str, html: &str) -> Self {
        self.pages.insert(symbol.to_string(), Ok(html.to_string()));
        self
    }

    pub fn with_status(mut self, symbol: &str, status: u16) -> Self {
        self.pages.insert(symbol.to_string(), Err(status));
        self
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, symbol: &str) -> Result<String> {
        match self.pages.get(symbol).cloned().unwrap_or(Err(404)) {
            Ok(html) => Ok(html),
            Err(status) => Err(AppError::FetchStatus {
                symbol: symbol.to_string(),
                status,
            }),
        }
    }
}

/// Real parser that counts its calls
#[derive(Default)]
pub struct CountingParser {
    calls: AtomicUsize,
}

impl CountingParser {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PageParser for CountingParser {
    fn parse(&self, html: &str) -> Result<FaceplatePage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        FaceplateParser::new().parse(html)
    }
}

/// In-memory symbol list
pub struct FakeSource {
    data: Option<Vec<u8>>,
}

impl FakeSource {
    pub fn new(csv: &str) -> Self {
        Self {
            data: Some(csv.as_bytes().to_vec()),
        }
    }

    pub fn missing() -> Self {
        Self { data: None }
    }
}

#[async_trait]
impl SymbolSource for FakeSource {
    fn location(&self) -> String {
        "memory".to_string()
    }

    async fn fetch_symbol_list(&self) -> Result<Vec<u8>> {
        self.data
            .clone()
            .ok_or_else(|| AppError::NotFound("memory symbol list".to_string()))
    }
}

/// Keeps upserted records; rejects ISINs listed in `fail_isins`
#[derive(Default)]
pub struct RecordingSink {
    pub records: Mutex<Vec<StockRecord>>,
    pub fail_isins: Vec<String>,
}

#[async_trait]
impl RecordSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn upsert(&self, record: &StockRecord) -> Result<()> {
        if self.fail_isins.contains(&record.isin) {
            return Err(AppError::Warehouse(format!("rejected {}", record.isin)));
        }
        self.records.lock().push(record.clone());
        Ok(())
    }
}

pub fn test_state(
    fetcher: FakeFetcher,
    parser: Arc<CountingParser>,
    source: FakeSource,
    sink: Arc<RecordingSink>,
) -> AppState {
    AppState::new(
        Arc::new(fetcher),
        parser,
        Arc::new(source),
        sink,
    )
}

//! Stock page scraping
//!
//! Fetching and parsing are behind traits so the extraction pipeline can
//! run against synthetic pages.

pub mod types;
pub mod html;
pub mod normalize;
pub mod pairing;
pub mod parser;
pub mod fetcher;

use crate::error::Result;
use async_trait::async_trait;
use types::FaceplatePage;

pub use fetcher::HttpPageFetcher;
pub use parser::FaceplateParser;

/// Retrieves the raw HTML page for a symbol
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Body on a 2xx response; transport errors and other statuses are errors
    async fn fetch(&self, symbol: &str) -> Result<String>;
}

/// Turns raw HTML into the fields the pipeline needs
pub trait PageParser: Send + Sync {
    fn parse(&self, html: &str) -> Result<FaceplatePage>;
}

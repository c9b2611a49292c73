//! HTTP page fetcher

use super::PageFetcher;
use crate::config::ScraperConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Fetches `{base_url}/{symbol}` with a bounded timeout
pub struct HttpPageFetcher {
    client: Client,
    base_url: String,
}

impl HttpPageFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("fr-FR,fr;q=0.9,en;q=0.5"),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn page_url(&self, symbol: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(symbol))
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, symbol: &str) -> Result<String> {
        let url = self.page_url(symbol);
        info!("Fetching data for {} from {}", symbol, url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            debug!("Request exception occurred for {}: {}", symbol, e);
            AppError::Http(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!("HTTP error occurred for {}: {}", symbol, status);
            return Err(AppError::FetchStatus {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

//! Symbol list in a Google Cloud Storage bucket

use super::SymbolSource;
use crate::config::Config;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{error, info};

/// Downloads one object through the JSON API media endpoint
pub struct GcsSource {
    client: Client,
    base_url: String,
    bucket: String,
    object: String,
    access_token: Option<String>,
}

impl GcsSource {
    pub fn new(
        base_url: &str,
        bucket: &str,
        object: &str,
        access_token: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            object: object.to_string(),
            access_token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let bucket = config
            .storage
            .bucket
            .as_deref()
            .ok_or_else(|| {
                AppError::Config("GCS_BUCKET must be set for Cloud Storage".to_string())
            })?;

        Self::new(
            &config.storage.gcs_base_url,
            bucket,
            &config.storage.object_key,
            config.access_token.clone(),
        )
    }

    pub fn object_url(&self) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}",
            self.base_url,
            urlencoding::encode(&self.bucket),
            urlencoding::encode(&self.object)
        )
    }
}

#[async_trait]
impl SymbolSource for GcsSource {
    fn location(&self) -> String {
        format!("gs://{}/{}", self.bucket, self.object)
    }

    async fn fetch_symbol_list(&self) -> Result<Vec<u8>> {
        info!("Downloading symbol list from {}", self.location());

        let mut request = self.client.get(self.object_url()).query(&[("alt", "media")]);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            error!("CSV file not found in GCS: {} {}", self.bucket, self.object);
            return Err(AppError::NotFound(format!(
                "CSV file not found in GCS: {}",
                self.location()
            )));
        }
        if !status.is_success() {
            return Err(AppError::Storage(format!(
                "Cloud Storage returned {} for {}",
                status,
                self.location()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

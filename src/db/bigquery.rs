//! BigQuery sink
//!
//! Runs a parameterized `MERGE` through the `jobs.query` REST endpoint.

use super::RecordSink;
use crate::config::{validate_identifier, validate_project_id, Config};
use crate::error::{AppError, Result};
use crate::scrape::types::StockRecord;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;

const QUERY_TIMEOUT_MS: u64 = 10_000;

/// BigQuery table sink
pub struct BigQuerySink {
    client: Client,
    base_url: String,
    project: String,
    table_id: String,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    job_complete: Option<bool>,
    errors: Option<Vec<ErrorProto>>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseBody {
    error: Option<ErrorProto>,
}

#[derive(Debug, Deserialize)]
struct ErrorProto {
    message: Option<String>,
}

impl BigQuerySink {
    pub fn new(
        base_url: &str,
        project: &str,
        dataset: &str,
        table: &str,
        access_token: Option<String>,
    ) -> Result<Self> {
        validate_project_id(project)?;
        validate_identifier(dataset)?;
        validate_identifier(table)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(QUERY_TIMEOUT_MS + 20_000))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            project: project.to_string(),
            table_id: format!("{}.{}.{}", project, dataset, table),
            access_token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let project = config
            .project
            .as_deref()
            .ok_or_else(|| AppError::Config("GCP_PROJECT must be set for BigQuery".to_string()))?;

        Self::new(
            &config.warehouse.bigquery_base_url,
            project,
            &config.warehouse.dataset,
            &config.warehouse.table,
            config.access_token.clone(),
        )
    }

    fn merge_query(&self) -> String {
        format!(
            r#"
    MERGE `{table_id}` AS T
    USING (
      SELECT
        @isin AS isin,
        @name AS name,
        @label AS label,
        @pe_ratio AS pe_ratio,
        @div_yield AS div_yield,
        @scraped_at AS scraped_at
    ) AS S
    ON T.isin = S.isin
    WHEN MATCHED THEN
      UPDATE SET
        name = S.name,
        label = S.label,
        pe_ratio = S.pe_ratio,
        div_yield = S.div_yield,
        scraped_at = S.scraped_at
    WHEN NOT MATCHED THEN
      INSERT (isin, name, label, pe_ratio, div_yield, scraped_at)
      VALUES (S.isin, S.name, S.label, S.pe_ratio, S.div_yield, S.scraped_at)
    "#,
            table_id = self.table_id
        )
    }

    /// Request body for `jobs.query`
    pub fn query_request(&self, record: &StockRecord) -> Value {
        json!({
            "query": self.merge_query(),
            "useLegacySql": false,
            "parameterMode": "NAMED",
            "timeoutMs": QUERY_TIMEOUT_MS,
            "queryParameters": [
                parameter("isin", "STRING", record.isin.clone()),
                parameter("name", "STRING", record.name.clone()),
                parameter("label", "STRING", record.label.clone()),
                parameter("pe_ratio", "NUMERIC", record.pe_ratio.to_string()),
                parameter("div_yield", "NUMERIC", record.div_yield.to_string()),
                parameter("scraped_at", "TIMESTAMP", record.scraped_at_string()),
            ],
        })
    }
}

fn parameter(name: &str, kind: &str, value: String) -> Value {
    json!({
        "name": name,
        "parameterType": { "type": kind },
        "parameterValue": { "value": value },
    })
}

#[async_trait]
impl RecordSink for BigQuerySink {
    fn name(&self) -> &'static str {
        "bigquery"
    }

    async fn upsert(&self, record: &StockRecord) -> Result<()> {
        let url = format!("{}/projects/{}/queries", self.base_url, self.project);

        let mut request = self.client.post(&url).json(&self.query_request(record));
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponseBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .unwrap_or(body);
            return Err(AppError::Warehouse(format!("BigQuery returned {}: {}", status, message)));
        }

        let result: QueryResponse = response.json().await?;

        if let Some(message) = result
            .errors
            .unwrap_or_default()
            .into_iter()
            .find_map(|e| e.message)
        {
            return Err(AppError::Warehouse(format!("BigQuery query failed: {}", message)));
        }

        if result.job_complete != Some(true) {
            return Err(AppError::Warehouse(format!(
                "BigQuery query did not complete within {} ms",
                QUERY_TIMEOUT_MS
            )));
        }

        info!("Upserted data for ISIN: {}", record.isin);
        Ok(())
    }
}

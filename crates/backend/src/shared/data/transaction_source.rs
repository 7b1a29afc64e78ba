use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use contracts::dashboards::d402_sales_report::TransactionRecord;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use crate::shared::config::{self, SourceConfig};

static SOURCE: OnceCell<Arc<dyn TransactionSource>> = OnceCell::new();

/// Supplier of raw transaction records
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Full feed, used by period-mode filtering
    async fn fetch_all(&self) -> Result<Vec<TransactionRecord>>;

    /// Records dated within `[start, end]`, both inclusive
    async fn fetch_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TransactionRecord>>;

    fn source_name(&self) -> &str;
}

/// The feed answers either with a bare array or with `{ "data": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum FeedResponse {
    Plain(Vec<TransactionRecord>),
    Wrapped { data: Vec<TransactionRecord> },
}

impl FeedResponse {
    fn into_records(self) -> Vec<TransactionRecord> {
        match self {
            FeedResponse::Plain(records) => records,
            FeedResponse::Wrapped { data } => data,
        }
    }
}

fn parse_feed(body: &str) -> Result<Vec<TransactionRecord>> {
    let text = body.trim_start_matches('\u{FEFF}');
    let response: FeedResponse = serde_json::from_str(text)?;
    Ok(response.into_records())
}

// ---------------------------------------------------------------------------
// HTTP feed
// ---------------------------------------------------------------------------

/// HTTP client of the sales API
pub struct HttpTransactionSource {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl HttpTransactionSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    async fn get_records(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<TransactionRecord>> {
        let mut request = self.client.get(url).query(query);
        if !self.api_token.trim().is_empty() {
            request = request.header("Authorization", format!("Bearer {}", self.api_token));
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Sales API request failed: {} {}", status, body);
            anyhow::bail!("Sales API request failed with status {}: {}", status, body);
        }

        let body = response.text().await?;
        let preview: String = body.chars().take(300).collect();
        tracing::debug!("Sales API response preview: {}", preview);

        let records = parse_feed(&body)?;
        tracing::info!("Sales API returned {} records from {}", records.len(), url);
        Ok(records)
    }
}

#[async_trait]
impl TransactionSource for HttpTransactionSource {
    async fn fetch_all(&self) -> Result<Vec<TransactionRecord>> {
        let url = format!("{}/transactions", self.base_url);
        self.get_records(&url, &[]).await
    }

    async fn fetch_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TransactionRecord>> {
        let url = format!("{}/transactions/range", self.base_url);
        let query = [
            ("start", start.format("%Y-%m-%d").to_string()),
            ("end", end.format("%Y-%m-%d").to_string()),
        ];
        self.get_records(&url, &query).await
    }

    fn source_name(&self) -> &str {
        "http"
    }
}

// ---------------------------------------------------------------------------
// In-memory feed (fixture files and tests)
// ---------------------------------------------------------------------------

/// Records held in memory
pub struct InMemoryTransactionSource {
    records: Vec<TransactionRecord>,
}

impl InMemoryTransactionSource {
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path)?;
        let records = parse_feed(&body)?;
        tracing::info!(
            "Loaded {} transaction records from {}",
            records.len(),
            path.display()
        );
        Ok(Self::new(records))
    }
}

#[async_trait]
impl TransactionSource for InMemoryTransactionSource {
    async fn fetch_all(&self) -> Result<Vec<TransactionRecord>> {
        Ok(self.records.clone())
    }

    /// Undated records never match a date range
    async fn fetch_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TransactionRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| {
                r.transaction_date
                    .map(|d| d >= start && d <= end)
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    fn source_name(&self) -> &str {
        "memory"
    }
}

// ---------------------------------------------------------------------------
// Global instance
// ---------------------------------------------------------------------------

/// Build the configured source and register it for the handlers
pub fn initialize_source(config: &SourceConfig) -> Result<()> {
    let source: Arc<dyn TransactionSource> = match config.fixture_path.as_deref() {
        Some(path) if !path.trim().is_empty() => {
            let resolved = config::resolve_path(path);
            Arc::new(InMemoryTransactionSource::from_json_file(&resolved)?)
        }
        _ => Arc::new(HttpTransactionSource::new(config)?),
    };

    tracing::info!("Transaction source: {}", source.source_name());

    SOURCE
        .set(source)
        .map_err(|_| anyhow::anyhow!("Transaction source already initialized"))
}

pub fn get_source() -> Option<Arc<dyn TransactionSource>> {
    SOURCE.get().cloned()
}

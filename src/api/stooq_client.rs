use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use tracing::debug;

use crate::models::{DailyRow, DailySeries};
use super::{DailySeriesProvider, ProviderError};

/// Stooq daily-quotes client.
///
/// Stooq serves historical daily data as a plain CSV download
/// (`/q/d/l/?s=<symbol>&d1=<yyyymmdd>&d2=<yyyymmdd>&i=d`) with
/// `Date,Open,High,Low,Close,Volume` columns. No authentication required.
pub struct StooqClient {
    client: Client,
    base_url: String,
}

const DEFAULT_BASE_URL: &str = "https://stooq.com";

impl StooqClient {
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a non-default endpoint (test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("market-brief/0.1")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl DailySeriesProvider for StooqClient {
    async fn fetch_daily_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DailySeries, ProviderError> {
        debug!("Fetching daily series for {} ({} to {})", symbol, start, end);

        let url = format!("{}/q/d/l/", self.base_url);
        let body = self
            .client
            .get(&url)
            .query(&[
                ("s", symbol),
                ("d1", &start.format("%Y%m%d").to_string()),
                ("d2", &end.format("%Y%m%d").to_string()),
                ("i", "d"),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let series = parse_daily_csv(&body)?;
        debug!("Received {} rows for {}", series.rows.len(), symbol);
        Ok(series)
    }
}

/// Parse a Stooq daily CSV body into a date-ordered series.
///
/// An empty body or the literal "No data" answer (unknown symbol) becomes an
/// empty series with no close column. Unparsable close cells become missing
/// values rather than errors; a row with a bad date is a malformed response.
fn parse_daily_csv(body: &str) -> Result<DailySeries, ProviderError> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("no data") {
        return Ok(DailySeries::default());
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(trimmed.as_bytes());
    let headers = reader.headers()?.clone();
    let date_idx = headers
        .iter()
        .position(|h| h == "Date")
        .ok_or_else(|| ProviderError::Malformed("missing Date column".to_string()))?;
    let close_idx = headers.iter().position(|h| h == "Close");

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let date_field = record.get(date_idx).unwrap_or("");
        let date = NaiveDate::parse_from_str(date_field, "%Y-%m-%d").map_err(|e| {
            ProviderError::Malformed(format!("bad date '{}': {}", date_field, e))
        })?;
        let close = close_idx
            .and_then(|i| record.get(i))
            .and_then(|v| v.parse::<f64>().ok());
        rows.push(DailyRow { date, close });
    }
    rows.sort_by_key(|r| r.date);

    Ok(DailySeries {
        has_close: close_idx.is_some(),
        rows,
    })
}

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::DailySeries;

pub mod stooq_client;
pub use stooq_client::StooqClient;

/// Failure reported by a daily-series data source.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Malformed(String),
}

/// Time-series data source queried by a provider-specific symbol and an
/// inclusive date range. The source is assumed to omit non-trading days.
#[async_trait]
pub trait DailySeriesProvider {
    async fn fetch_daily_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DailySeries, ProviderError>;
}

use chrono::{Duration, NaiveDate};
use tracing::{info, warn};

use crate::api::DailySeriesProvider;
use crate::models::{ChangeDirection, IndexSummary};

/// Days of history requested before the run date. Generous enough to span
/// long holiday stretches while still being a single cheap request.
const LOOKBACK_DAYS: i64 = 40;

/// Resolve the latest day-over-day change for one index.
///
/// The report summarizes the previous completed session, so rows dated on or
/// after `run_date` are excluded even when the source already has them. Any
/// provider failure is absorbed into the summary's `error` field; this never
/// returns an error or panics.
pub async fn resolve(
    provider: &dyn DailySeriesProvider,
    name: &str,
    symbol: &str,
    run_date: NaiveDate,
) -> IndexSummary {
    let start = run_date - Duration::days(LOOKBACK_DAYS);

    let series = match provider.fetch_daily_series(symbol, start, run_date).await {
        Ok(series) => series,
        Err(e) => {
            warn!("Failed to fetch {} ({}): {}", name, symbol, e);
            return IndexSummary::unavailable(name, e.to_string());
        }
    };

    if !series.has_close {
        warn!("{} ({}): series has no close column", name, symbol);
        return IndexSummary::unavailable(name, "not-enough-data");
    }

    let mut closes: Vec<(NaiveDate, f64)> = series
        .rows
        .iter()
        .filter_map(|row| row.close.map(|c| (row.date, c)))
        .filter(|(date, _)| *date < run_date)
        .collect();
    closes.sort_by_key(|(date, _)| *date);

    if closes.len() < 2 {
        warn!(
            "{} ({}): only {} close(s) before {}",
            name,
            symbol,
            closes.len(),
            run_date
        );
        return IndexSummary::unavailable(name, "not-enough-close-values");
    }

    let (_, prev_close) = closes[closes.len() - 2];
    let (base_date, close) = closes[closes.len() - 1];
    let change_pct = (close - prev_close) / prev_close * 100.0;

    info!(
        "{} ({}): close {:.2} on {} ({:+.2}%)",
        name, symbol, close, base_date, change_pct
    );

    IndexSummary {
        name: name.to_string(),
        close: Some(close),
        change_pct: Some(change_pct),
        direction: ChangeDirection::from_change_pct(change_pct),
        base_date: Some(base_date),
        error: None,
    }
}

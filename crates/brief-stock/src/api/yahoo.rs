//! Yahoo Finance market-data client

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

use crate::analysis::{ColumnLabel, RawTable};
use crate::error::{Result, StockError};
use crate::sources::MarketDataSource;

/// Yahoo Finance API client
#[derive(Debug, Clone, Default)]
pub struct YahooFinanceClient {}

/// Daily bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjclose: f64,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self {}
    }

    /// Get historical quotes for a symbol
    pub async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| StockError::YahooFinanceError(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| StockError::YahooFinanceError(format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        Ok(quotes
            .iter()
            .filter_map(|q| {
                let Some(timestamp) = bar_time(q.timestamp as i64) else {
                    tracing::warn!("Skipping {} bar with invalid timestamp {}", symbol, q.timestamp);
                    return None;
                };
                Some(Quote {
                    timestamp,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                    adjclose: q.adjclose,
                })
            })
            .collect())
    }

    /// Get historical quotes for a trailing period such as `6mo`
    pub async fn get_historical_range(&self, symbol: &str, period: &str) -> Result<Vec<Quote>> {
        let end = Utc::now();
        let start = period_start(period, end)?;
        self.get_historical_quotes(symbol, start, end).await
    }
}

fn bar_time(unix_seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(unix_seconds, 0)
}

/// Start of a trailing window ending at `end`
pub fn period_start(period: &str, end: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let start = match period {
        "1d" => end - chrono::Duration::days(1),
        "5d" => end - chrono::Duration::days(5),
        "1mo" => end - chrono::Duration::days(30),
        "3mo" => end - chrono::Duration::days(90),
        "6mo" => end - chrono::Duration::days(180),
        "1y" => end - chrono::Duration::days(365),
        "2y" => end - chrono::Duration::days(730),
        "5y" => end - chrono::Duration::days(1825),
        "10y" => end - chrono::Duration::days(3650),
        "ytd" => NaiveDate::from_ymd_opt(end.year(), 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .ok_or_else(|| StockError::Other(format!("No start of year for {end}")))?,
        "max" => end - chrono::Duration::days(36500), // ~100 years
        _ => return Err(StockError::ConfigError(format!("Invalid period: {period}"))),
    };
    Ok(start)
}

/// Lay quotes out as a table keyed by `(field, symbol)`
pub fn quotes_to_table(symbol: &str, quotes: &[Quote]) -> Result<RawTable> {
    let label = |field: &str| ColumnLabel::Levels(vec![field.to_string(), symbol.to_string()]);
    let column = |f: fn(&Quote) -> f64| quotes.iter().map(|q| Some(f(q))).collect::<Vec<_>>();

    let dates = quotes.iter().map(|q| q.timestamp.date_naive()).collect();

    RawTable::new(dates)
        .with_column(label("Open"), column(|q| q.open))?
        .with_column(label("High"), column(|q| q.high))?
        .with_column(label("Low"), column(|q| q.low))?
        .with_column(label("Close"), column(|q| q.close))?
        .with_column(label("Adj Close"), column(|q| q.adjclose))?
        .with_column(label("Volume"), column(|q| q.volume as f64))
}

#[async_trait]
impl MarketDataSource for YahooFinanceClient {
    async fn fetch_series(&self, symbol: &str, period: &str) -> Result<RawTable> {
        let quotes = self.get_historical_range(symbol, period).await?;
        tracing::debug!("Yahoo returned {} bars for {}", quotes.len(), symbol);
        quotes_to_table(symbol, &quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(day: u32, close: f64, volume: u64) -> Quote {
        Quote {
            timestamp: NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(14, 30, 0)
                .unwrap()
                .and_utc(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume,
            adjclose: close,
        }
    }

    #[test]
    fn test_quotes_to_table_uses_field_symbol_labels() {
        let table = quotes_to_table("AAPL", &[quote(1, 170.0, 100), quote(4, 171.5, 200)]).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.flat_labels(),
            vec![
                "Open_AAPL",
                "High_AAPL",
                "Low_AAPL",
                "Close_AAPL",
                "Adj Close_AAPL",
                "Volume_AAPL"
            ]
        );
        assert_eq!(table.dates()[1], NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());

        // "Close" matches the plain close before the adjusted one
        let schema = table.match_schema().unwrap();
        assert_eq!(schema.close, 3);
        assert_eq!(schema.volume, 5);
    }

    #[test]
    fn test_no_quotes_is_empty_table() {
        let table = quotes_to_table("AAPL", &[]).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_period_start() {
        let end = NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();

        assert_eq!((end - period_start("6mo", end).unwrap()).num_days(), 180);
        assert_eq!(
            period_start("ytd", end).unwrap().date_naive(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert!(period_start("7w", end).is_err());
    }

    #[test]
    fn test_bar_time_rejects_out_of_range() {
        assert_eq!(
            bar_time(1_709_303_400).map(|t| t.date_naive()),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert!(bar_time(i64::MAX).is_none());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_series() {
        let client = YahooFinanceClient::new();
        let table = client.fetch_series("AAPL", "1mo").await.unwrap();
        assert!(!table.is_empty());
        assert!(table.match_schema().is_ok());
    }
}

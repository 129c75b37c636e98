//! News API clients for company news

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::analysis::RawNewsItem;
use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::sources::NewsSource;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const DEFAULT_RATE_LIMIT: NonZeroU32 = NonZeroU32::MIN.saturating_add(59);

/// Finnhub news article
///
/// Finnhub omits or blanks fields freely, so all of them default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinnhubNewsArticle {
    /// Article category
    pub category: String,
    /// Publish time (UNIX timestamp)
    pub datetime: i64,
    /// News headline
    pub headline: String,
    /// Unique article ID
    pub id: i64,
    /// Related symbols
    pub related: String,
    /// News source
    pub source: String,
    /// Article summary
    pub summary: String,
    /// Article URL
    pub url: String,
}

impl From<FinnhubNewsArticle> for RawNewsItem {
    fn from(article: FinnhubNewsArticle) -> Self {
        let present = |s: String| (!s.trim().is_empty()).then_some(s);
        RawNewsItem {
            title: present(article.headline),
            link: present(article.url),
            publisher: present(article.source),
        }
    }
}

/// Finnhub client for news API
pub struct FinnhubClient {
    client: Client,
    api_key: Option<String>,
    lookback_days: i64,
    rate_limiter: SharedRateLimiter,
}

impl FinnhubClient {
    /// Create a new Finnhub client with rate limiting
    ///
    /// # Arguments
    /// * `api_key` - Finnhub API key
    /// * `rate_limit` - Requests per minute (free tier: 60, premium: 300+)
    pub fn new(api_key: impl Into<String>, rate_limit: u32) -> Self {
        Self::build(Some(api_key.into()), rate_limit, 7)
    }

    /// Create a client from the shared configuration
    ///
    /// Without a configured key every fetch fails, which the engine reports
    /// as a news issue for the symbol.
    pub fn from_config(config: &StockConfig) -> Self {
        Self::build(
            config.finnhub_api_key.clone(),
            config.finnhub_rate_limit,
            config.news_lookback_days,
        )
    }

    fn build(api_key: Option<String>, rate_limit: u32, lookback_days: i64) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(DEFAULT_RATE_LIMIT));

        Self {
            client: Client::new(),
            api_key,
            lookback_days: lookback_days.max(1),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Get company news for a specific symbol
    ///
    /// # Arguments
    /// * `symbol` - Stock symbol (e.g., "AAPL")
    /// * `from` - Start date
    /// * `to` - End date
    pub async fn get_company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FinnhubNewsArticle>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| StockError::ConfigError("FINNHUB_API_KEY is not set".to_string()))?;

        let from = from.format("%Y-%m-%d").to_string();
        let to = to.format("%Y-%m-%d").to_string();

        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get("https://finnhub.io/api/v1/company-news")
            .query(&[
                ("symbol", symbol),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("token", api_key),
            ])
            .send()
            .await
            .map_err(|e| StockError::ApiError(format!("Finnhub request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StockError::ApiError(format!(
                "Finnhub API error {status}: {body}"
            )));
        }

        response
            .json::<Vec<FinnhubNewsArticle>>()
            .await
            .map_err(|e| StockError::ApiError(format!("Failed to parse Finnhub response: {e}")))
    }
}

#[async_trait]
impl NewsSource for FinnhubClient {
    async fn fetch_news(&self, symbol: &str) -> Result<Vec<RawNewsItem>> {
        let to = Utc::now().date_naive();
        let from = to - Duration::days(self.lookback_days);

        let articles = self.get_company_news(symbol, from, to).await?;
        Ok(articles.into_iter().map(RawNewsItem::from).collect())
    }
}

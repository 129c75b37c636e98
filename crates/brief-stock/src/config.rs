//! Configuration for stock report runs

use crate::error::{Result, StockError};
use brief_utils::env_override;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Trailing windows understood by the market-data clients
pub const HISTORY_PERIODS: &[&str] = &[
    "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];

/// Number of news items per symbol for each view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsCount {
    /// Single-symbol view
    pub single: usize,
    /// Multi-symbol comparison
    pub compare: usize,
}

impl Default for NewsCount {
    fn default() -> Self {
        Self {
            single: 5,
            compare: 3,
        }
    }
}

/// Which report view a run is producing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportView {
    Single,
    Compare,
}

/// Configuration for stock report runs
///
/// Built once at startup and shared read-only (behind an `Arc`) by the
/// orchestrator and every collaborator client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StockConfig {
    /// Trailing market-data window, e.g. `6mo`
    pub history_period: String,

    /// Moving-average window sizes over the close series
    pub ma_windows: Vec<usize>,

    /// News items per symbol
    pub news_count: NewsCount,

    /// Longest accepted ticker symbol
    pub max_symbol_len: usize,

    /// Symbol pipelines allowed to run at once
    pub max_concurrent_symbols: usize,

    /// Timeout for one generation call, in milliseconds
    pub generation_timeout_ms: u64,

    /// Timeout for one market-data fetch, in milliseconds
    pub market_data_timeout_ms: u64,

    /// Timeout for one news fetch, in milliseconds
    pub news_timeout_ms: u64,

    /// How far back the news client looks
    pub news_lookback_days: i64,

    /// Crew-style generation endpoint
    pub generation_endpoint: Option<String>,

    /// Bearer token for the generation endpoint
    pub generation_api_key: Option<String>,

    /// Finnhub API key for company news
    pub finnhub_api_key: Option<String>,

    /// Finnhub requests per minute
    pub finnhub_rate_limit: u32,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            history_period: "6mo".to_string(),
            ma_windows: vec![20, 50],
            news_count: NewsCount::default(),
            max_symbol_len: 10,
            max_concurrent_symbols: 4,
            generation_timeout_ms: 180_000,
            market_data_timeout_ms: 30_000,
            news_timeout_ms: 30_000,
            news_lookback_days: 7,
            generation_endpoint: None,
            generation_api_key: None,
            finnhub_api_key: None,
            finnhub_rate_limit: 60,
        }
    }
}

impl StockConfig {
    /// Create a new configuration builder
    pub fn builder() -> StockConfigBuilder {
        StockConfigBuilder::default()
    }

    /// Load a configuration file; keys it omits keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = brief_utils::load_json_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides for credentials and tunables
    pub fn with_env(mut self) -> Result<Self> {
        if let Some(period) = env_override::<String>("STOCK_BRIEF_HISTORY_PERIOD")? {
            self.history_period = period;
        }
        if let Some(limit) = env_override::<usize>("STOCK_BRIEF_MAX_CONCURRENCY")? {
            self.max_concurrent_symbols = limit;
        }
        if let Some(secs) = env_override::<u64>("STOCK_BRIEF_GENERATION_TIMEOUT")? {
            self.generation_timeout_ms = secs.saturating_mul(1000);
        }
        if let Some(url) = env_override::<String>("CREW_API_URL")? {
            self.generation_endpoint = Some(url);
        }
        if let Some(key) = env_override::<String>("CREW_API_KEY")? {
            self.generation_api_key = Some(key);
        }
        if let Some(key) = env_override::<String>("FINNHUB_API_KEY")? {
            self.finnhub_api_key = Some(key);
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !HISTORY_PERIODS.contains(&self.history_period.as_str()) {
            return Err(StockError::ConfigError(format!(
                "unsupported history_period '{}', expected one of {}",
                self.history_period,
                HISTORY_PERIODS.join(", ")
            )));
        }

        if self.ma_windows.is_empty() {
            return Err(StockError::ConfigError(
                "ma_windows must name at least one window".to_string(),
            ));
        }

        if self.ma_windows.contains(&0) {
            return Err(StockError::ConfigError(
                "ma_windows entries must be greater than 0".to_string(),
            ));
        }

        if self.max_symbol_len == 0 {
            return Err(StockError::ConfigError(
                "max_symbol_len must be greater than 0".to_string(),
            ));
        }

        if self.max_concurrent_symbols == 0 {
            return Err(StockError::ConfigError(
                "max_concurrent_symbols must be greater than 0".to_string(),
            ));
        }

        if self.generation_timeout_ms == 0
            || self.market_data_timeout_ms == 0
            || self.news_timeout_ms == 0
        {
            return Err(StockError::ConfigError(
                "collaborator timeouts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// News items to keep for a view
    pub fn news_count_for(&self, view: ReportView) -> usize {
        match view {
            ReportView::Single => self.news_count.single,
            ReportView::Compare => self.news_count.compare,
        }
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_millis(self.generation_timeout_ms)
    }

    pub fn market_data_timeout(&self) -> Duration {
        Duration::from_millis(self.market_data_timeout_ms)
    }

    pub fn news_timeout(&self) -> Duration {
        Duration::from_millis(self.news_timeout_ms)
    }
}

/// Builder for StockConfig
#[derive(Debug, Default)]
pub struct StockConfigBuilder {
    history_period: Option<String>,
    ma_windows: Option<Vec<usize>>,
    news_count: Option<NewsCount>,
    max_symbol_len: Option<usize>,
    max_concurrent_symbols: Option<usize>,
    generation_timeout: Option<Duration>,
    market_data_timeout: Option<Duration>,
    news_timeout: Option<Duration>,
    generation_endpoint: Option<String>,
    generation_api_key: Option<String>,
    finnhub_api_key: Option<String>,
}

impl StockConfigBuilder {
    /// Set the trailing market-data window
    pub fn history_period(mut self, period: impl Into<String>) -> Self {
        self.history_period = Some(period.into());
        self
    }

    /// Set the moving-average windows
    pub fn ma_windows(mut self, windows: impl Into<Vec<usize>>) -> Self {
        self.ma_windows = Some(windows.into());
        self
    }

    /// Set news counts for both views
    pub fn news_count(mut self, single: usize, compare: usize) -> Self {
        self.news_count = Some(NewsCount { single, compare });
        self
    }

    /// Set the longest accepted symbol
    pub fn max_symbol_len(mut self, len: usize) -> Self {
        self.max_symbol_len = Some(len);
        self
    }

    /// Set how many symbol pipelines may run at once
    pub fn max_concurrent_symbols(mut self, limit: usize) -> Self {
        self.max_concurrent_symbols = Some(limit);
        self
    }

    /// Set the generation timeout
    pub fn generation_timeout(mut self, duration: Duration) -> Self {
        self.generation_timeout = Some(duration);
        self
    }

    /// Set the market-data timeout
    pub fn market_data_timeout(mut self, duration: Duration) -> Self {
        self.market_data_timeout = Some(duration);
        self
    }

    /// Set the news timeout
    pub fn news_timeout(mut self, duration: Duration) -> Self {
        self.news_timeout = Some(duration);
        self
    }

    /// Set the generation endpoint
    pub fn generation_endpoint(mut self, url: impl Into<String>) -> Self {
        self.generation_endpoint = Some(url.into());
        self
    }

    /// Set the generation endpoint token
    pub fn generation_api_key(mut self, key: impl Into<String>) -> Self {
        self.generation_api_key = Some(key.into());
        self
    }

    /// Set the Finnhub API key
    pub fn finnhub_api_key(mut self, key: impl Into<String>) -> Self {
        self.finnhub_api_key = Some(key.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<StockConfig> {
        let defaults = StockConfig::default();

        let millis = |d: Duration| u64::try_from(d.as_millis()).unwrap_or(u64::MAX);

        let config = StockConfig {
            history_period: self.history_period.unwrap_or(defaults.history_period),
            ma_windows: self.ma_windows.unwrap_or(defaults.ma_windows),
            news_count: self.news_count.unwrap_or(defaults.news_count),
            max_symbol_len: self.max_symbol_len.unwrap_or(defaults.max_symbol_len),
            max_concurrent_symbols: self
                .max_concurrent_symbols
                .unwrap_or(defaults.max_concurrent_symbols),
            generation_timeout_ms: self
                .generation_timeout
                .map_or(defaults.generation_timeout_ms, millis),
            market_data_timeout_ms: self
                .market_data_timeout
                .map_or(defaults.market_data_timeout_ms, millis),
            news_timeout_ms: self.news_timeout.map_or(defaults.news_timeout_ms, millis),
            generation_endpoint: self.generation_endpoint,
            generation_api_key: self.generation_api_key,
            finnhub_api_key: self.finnhub_api_key,
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }
}

//! Stock brief engine
//!
//! Turns generated narratives about a stock into structured figures and
//! pairs them with price history and recent headlines. It includes:
//!
//! - Metric extraction from the performance narrative (price, change, percent change, volume)
//! - Close/volume series normalization with simple moving averages
//! - Top-N news summaries
//! - Concurrent multi-symbol comparison with per-symbol failure isolation
//!
//! # Architecture
//!
//! The [`ComparisonOrchestrator`] runs one pipeline per symbol against three
//! collaborator traits from [`sources`]:
//! - `NarrativeGenerator`: performance and recommendation narratives
//! - `MarketDataSource`: trailing OHLCV history
//! - `NewsSource`: recent headlines
//!
//! Production clients for each live in [`api`].
//!
//! # Example
//!
//! ```rust,ignore
//! use brief_stock::api::{CrewClient, FinnhubClient, YahooFinanceClient};
//! use brief_stock::{ComparisonOrchestrator, StockConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(StockConfig::default().with_env()?);
//!
//!     let orchestrator = ComparisonOrchestrator::new(
//!         config.clone(),
//!         Arc::new(CrewClient::from_config(&config)?),
//!         Arc::new(YahooFinanceClient::new()),
//!         Arc::new(FinnhubClient::from_config(&config)),
//!     )?;
//!
//!     let report = orchestrator.compare(&["AAPL", "MSFT"]).await?;
//!     for result in &report.results {
//!         println!("{}: {:?}", result.symbol, result.metrics.price);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod sources;

// Re-export main types for convenience
pub use analysis::{
    ExtractedMetrics, MetricExtractor, NewsItem, RawNewsItem, RawTable, SeriesReport,
    TimeSeriesAnalyzer, summarize_news,
};
pub use config::{ReportView, StockConfig};
pub use engine::{ComparisonOrchestrator, ComparisonReport, ComparisonResult};
pub use error::{Collaborator, Result, StockError, SymbolError};
pub use generation::{CrewOutput, GenerationResult, Narratives, TaskOutput};

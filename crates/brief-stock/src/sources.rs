//! Boundaries to the external collaborators
//!
//! The engine only sees these traits. Production clients live in
//! [`crate::api`]; tests substitute `mockall` mocks.

use async_trait::async_trait;

use crate::analysis::{RawNewsItem, RawTable};
use crate::error::Result;
use crate::generation::GenerationResult;

/// Produces the performance and recommendation narratives for a symbol
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn invoke(&self, symbol: &str) -> Result<GenerationResult>;
}

/// Fetches trailing OHLCV history for a symbol
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// `period` is one of [`crate::config::HISTORY_PERIODS`]
    async fn fetch_series(&self, symbol: &str, period: &str) -> Result<RawTable>;
}

/// Fetches recent news for a symbol
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_news(&self, symbol: &str) -> Result<Vec<RawNewsItem>>;
}

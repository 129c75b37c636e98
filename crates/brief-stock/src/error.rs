//! Error types for stock report operations

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Request-level and client errors
#[derive(Debug, Error)]
pub enum StockError {
    /// API request failed
    #[error("API error: {0}")]
    ApiError(String),

    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// No usable symbols were left after normalization
    #[error("No valid symbols in request")]
    EmptyRequest,

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// A market-data table could not be assembled
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// Extraction pattern failed to compile
    #[error("Pattern error: {0}")]
    PatternError(#[from] regex::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

impl From<brief_utils::ConfigError> for StockError {
    fn from(err: brief_utils::ConfigError) -> Self {
        StockError::ConfigError(err.to_string())
    }
}

/// External collaborator a symbol pipeline waits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collaborator {
    Generation,
    MarketData,
    News,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Generation => "generation",
            Self::MarketData => "market data",
            Self::News => "news",
        };
        f.write_str(name)
    }
}

/// Failure attached to one symbol's result
///
/// These never abort a comparison. Generation-side failures halt the owning
/// symbol's pipeline; market-data and news failures ride along as issues.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SymbolError {
    /// Symbol rejected before any collaborator was called
    #[error("invalid symbol: {reason}")]
    InvalidSymbol { reason: String },

    /// Generation collaborator returned an error
    #[error("generation failed: {reason}")]
    GenerationFailed { reason: String },

    /// Generation result lacked two narrative outputs
    #[error("generation result shape mismatch: {reason}")]
    ShapeMismatch { reason: String },

    /// Market-data collaborator returned an error
    #[error("market data fetch failed: {reason}")]
    MarketDataFetch { reason: String },

    /// Market data came back with zero rows
    #[error("market data returned no rows")]
    DataFetchEmpty,

    /// No close or volume column could be identified
    #[error("market data schema not recognized: missing {}", .missing.join(", "))]
    SchemaNotRecognized { missing: Vec<String> },

    /// News collaborator returned an error
    #[error("news fetch failed: {reason}")]
    NewsFetch { reason: String },

    /// A collaborator call exceeded its configured timeout
    #[error("{collaborator} call timed out after {after_ms} ms")]
    Timeout {
        collaborator: Collaborator,
        after_ms: u64,
    },

    /// The symbol's task panicked or was cancelled
    #[error("pipeline aborted: {reason}")]
    PipelineAborted { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StockError::InvalidSymbol("INVALID".to_string());
        assert_eq!(err.to_string(), "Invalid symbol: INVALID");
        assert_eq!(StockError::EmptyRequest.to_string(), "No valid symbols in request");
    }

    #[test]
    fn test_symbol_error_display() {
        let err = SymbolError::SchemaNotRecognized {
            missing: vec!["Close".to_string(), "Volume".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "market data schema not recognized: missing Close, Volume"
        );

        let err = SymbolError::Timeout {
            collaborator: Collaborator::MarketData,
            after_ms: 1500,
        };
        assert_eq!(err.to_string(), "market data call timed out after 1500 ms");
    }

    #[test]
    fn test_symbol_error_serializes_with_kind() {
        let value = serde_json::to_value(SymbolError::NewsFetch {
            reason: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(value["kind"], "news_fetch");
        assert_eq!(value["reason"], "boom");
    }
}

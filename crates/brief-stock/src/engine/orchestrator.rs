//! Multi-symbol comparison orchestrator
//!
//! Each symbol runs its own pipeline on a tokio task:
//!
//! 1. generation → narrative adapter (halts the symbol on failure)
//! 2. metric extraction over the performance narrative
//! 3. market data → series analysis, concurrently with news → top-N
//!
//! Pipelines share only read-only state. Results are collected in request
//! order no matter which pipeline finishes first.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::result::{ComparisonReport, ComparisonResult};
use super::symbols::normalize_symbols;
use crate::analysis::{
    MetricExtractor, NewsItem, SeriesReport, TimeSeriesAnalyzer, summarize_news,
};
use crate::config::{ReportView, StockConfig};
use crate::error::{Collaborator, Result, StockError, SymbolError};
use crate::generation::Narratives;
use crate::sources::{MarketDataSource, NarrativeGenerator, NewsSource};

/// Drives per-symbol pipelines and gathers their results
pub struct ComparisonOrchestrator {
    pipeline: SymbolPipeline,
}

impl ComparisonOrchestrator {
    pub fn new(
        config: Arc<StockConfig>,
        generator: Arc<dyn NarrativeGenerator>,
        market_data: Arc<dyn MarketDataSource>,
        news: Arc<dyn NewsSource>,
    ) -> Result<Self> {
        config.validate()?;

        let extractor = Arc::new(MetricExtractor::new()?);
        let analyzer = Arc::new(TimeSeriesAnalyzer::new(config.ma_windows.clone())?);

        Ok(Self {
            pipeline: SymbolPipeline {
                config,
                generator,
                market_data,
                news,
                extractor,
                analyzer,
            },
        })
    }

    pub fn config(&self) -> &StockConfig {
        &self.pipeline.config
    }

    /// Single-symbol view
    pub async fn analyze(&self, symbol: &str) -> Result<ComparisonReport> {
        self.run(&[symbol], ReportView::Single).await
    }

    /// Multi-symbol comparison view
    pub async fn compare<S: AsRef<str>>(&self, symbols: &[S]) -> Result<ComparisonReport> {
        self.run(symbols, ReportView::Compare).await
    }

    /// Run every symbol's pipeline and return results in request order
    ///
    /// Only an empty request, or one in which every symbol is invalid,
    /// fails as a whole.
    pub async fn run<S: AsRef<str>>(
        &self,
        symbols: &[S],
        view: ReportView,
    ) -> Result<ComparisonReport> {
        let config = &self.pipeline.config;
        let symbols = normalize_symbols(symbols);

        if symbols.is_empty() {
            return Err(StockError::EmptyRequest);
        }
        if symbols
            .iter()
            .all(|s| s.chars().count() > config.max_symbol_len)
        {
            return Err(StockError::InvalidSymbol(symbols.join(", ")));
        }

        let news_limit = config.news_count_for(view);
        info!(
            "Running {:?} report for {} symbol(s): {}",
            view,
            symbols.len(),
            symbols.join(", ")
        );

        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_symbols));
        let handles: Vec<_> = symbols
            .iter()
            .map(|symbol| {
                let pipeline = self.pipeline.clone();
                let semaphore = Arc::clone(&semaphore);
                let symbol = symbol.clone();
                tokio::spawn(async move {
                    // The semaphore is never closed, so a failed acquire only drops the bound
                    let _permit = semaphore.acquire_owned().await.ok();
                    pipeline.run(symbol, news_limit).await
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (symbol, handle) in symbols.iter().zip(handles) {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Pipeline for {} aborted: {}", symbol, e);
                    results.push(ComparisonResult::halted(
                        symbol.clone(),
                        SymbolError::PipelineAborted {
                            reason: e.to_string(),
                        },
                    ));
                }
            }
        }

        let report = ComparisonReport::new(view, results);
        info!(
            "Report finished: {:.0}% of symbols succeeded",
            report.success_rate() * 100.0
        );
        Ok(report)
    }
}

/// Shared, cheaply clonable handles used by every symbol task
#[derive(Clone)]
struct SymbolPipeline {
    config: Arc<StockConfig>,
    generator: Arc<dyn NarrativeGenerator>,
    market_data: Arc<dyn MarketDataSource>,
    news: Arc<dyn NewsSource>,
    extractor: Arc<MetricExtractor>,
    analyzer: Arc<TimeSeriesAnalyzer>,
}

impl SymbolPipeline {
    async fn run(self, symbol: String, news_limit: usize) -> ComparisonResult {
        if symbol.chars().count() > self.config.max_symbol_len {
            warn!("Rejecting symbol {}: too long", symbol);
            return ComparisonResult::halted(
                symbol,
                SymbolError::InvalidSymbol {
                    reason: format!(
                        "longer than {} characters",
                        self.config.max_symbol_len
                    ),
                },
            );
        }

        let narratives = match self.narratives(&symbol).await {
            Ok(narratives) => narratives,
            Err(e) => {
                warn!("Halting {}: {}", symbol, e);
                return ComparisonResult::halted(symbol, e);
            }
        };

        let metrics = self.extractor.extract(&narratives.performance);
        debug!("Extracted metrics for {}: {:?}", symbol, metrics);

        let ((series, series_issue), (news, news_issue)) =
            tokio::join!(self.series(&symbol), self.news(&symbol, news_limit));

        let mut result = ComparisonResult::new(symbol, narratives, metrics);
        result.series = series;
        result.news = news;
        for issue in [series_issue, news_issue].into_iter().flatten() {
            warn!("{}: {}", result.symbol, issue);
            result.add_issue(issue);
        }

        result
    }

    async fn narratives(&self, symbol: &str) -> std::result::Result<Narratives, SymbolError> {
        let generated = call_with_timeout(
            Collaborator::Generation,
            self.config.generation_timeout(),
            self.generator.invoke(symbol),
        )
        .await?;

        Narratives::try_from(generated)
    }

    async fn series(&self, symbol: &str) -> (SeriesReport, Option<SymbolError>) {
        let table = match call_with_timeout(
            Collaborator::MarketData,
            self.config.market_data_timeout(),
            self.market_data
                .fetch_series(symbol, &self.config.history_period),
        )
        .await
        {
            Ok(table) => table,
            Err(issue) => return (SeriesReport::NoData, Some(issue)),
        };

        if table.is_empty() {
            return (SeriesReport::NoData, Some(SymbolError::DataFetchEmpty));
        }

        match self.analyzer.analyze(&table) {
            Ok(report) => (report, None),
            Err(issue) => (SeriesReport::NoData, Some(issue)),
        }
    }

    async fn news(&self, symbol: &str, limit: usize) -> (Vec<NewsItem>, Option<SymbolError>) {
        match call_with_timeout(
            Collaborator::News,
            self.config.news_timeout(),
            self.news.fetch_news(symbol),
        )
        .await
        {
            Ok(items) => (summarize_news(items, limit), None),
            Err(issue) => (Vec::new(), Some(issue)),
        }
    }
}

/// Await a collaborator call, mapping failure and expiry to symbol errors
async fn call_with_timeout<T>(
    collaborator: Collaborator,
    limit: Duration,
    call: impl Future<Output = Result<T>>,
) -> std::result::Result<T, SymbolError> {
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            let reason = err.to_string();
            Err(match collaborator {
                Collaborator::Generation => SymbolError::GenerationFailed { reason },
                Collaborator::MarketData => SymbolError::MarketDataFetch { reason },
                Collaborator::News => SymbolError::NewsFetch { reason },
            })
        }
        Err(_) => Err(SymbolError::Timeout {
            collaborator,
            after_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

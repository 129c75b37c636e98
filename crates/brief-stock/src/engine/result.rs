//! Comparison result types

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::{ExtractedMetrics, NewsItem, SeriesReport};
use crate::config::ReportView;
use crate::error::SymbolError;
use crate::generation::Narratives;

/// Everything produced for one requested symbol
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub symbol: String,
    pub metrics: ExtractedMetrics,
    /// Absent when the pipeline halted before generation succeeded
    pub narratives: Option<Narratives>,
    pub series: SeriesReport,
    pub news: Vec<NewsItem>,
    /// Condition that halted this symbol's pipeline
    pub error: Option<SymbolError>,
    /// Non-fatal conditions met along the way
    pub issues: Vec<SymbolError>,
}

impl ComparisonResult {
    pub fn new(symbol: impl Into<String>, narratives: Narratives, metrics: ExtractedMetrics) -> Self {
        Self {
            symbol: symbol.into(),
            metrics,
            narratives: Some(narratives),
            series: SeriesReport::NoData,
            news: Vec::new(),
            error: None,
            issues: Vec::new(),
        }
    }

    /// Result for a symbol whose pipeline stopped early
    pub fn halted(symbol: impl Into<String>, error: SymbolError) -> Self {
        Self {
            symbol: symbol.into(),
            metrics: ExtractedMetrics::default(),
            narratives: None,
            series: SeriesReport::NoData,
            news: Vec::new(),
            error: Some(error),
            issues: Vec::new(),
        }
    }

    pub fn add_issue(&mut self, issue: SymbolError) {
        self.issues.push(issue);
    }

    /// Pipeline ran to the end (issues allowed)
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// Pipeline ran to the end without any issue
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && self.issues.is_empty()
    }
}

/// Ordered results for one request
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub view: ReportView,
    pub results: Vec<ComparisonResult>,
    pub timestamp: DateTime<Utc>,
}

impl ComparisonReport {
    pub fn new(view: ReportView, results: Vec<ComparisonResult>) -> Self {
        Self {
            view,
            results,
            timestamp: Utc::now(),
        }
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.symbol.as_str()).collect()
    }

    pub fn get(&self, symbol: &str) -> Option<&ComparisonResult> {
        self.results
            .iter()
            .find(|r| r.symbol.eq_ignore_ascii_case(symbol.trim()))
    }

    pub fn is_complete(&self) -> bool {
        self.results.iter().all(ComparisonResult::is_complete)
    }

    /// Share of symbols whose pipeline was not halted
    pub fn success_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        let succeeded = self.results.iter().filter(|r| r.succeeded()).count();
        succeeded as f64 / self.results.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(symbol: &str) -> ComparisonResult {
        ComparisonResult::new(symbol, Narratives::default(), ExtractedMetrics::default())
    }

    #[test]
    fn test_success_rate_and_completeness() {
        let mut with_issue = ok("MSFT");
        with_issue.add_issue(SymbolError::DataFetchEmpty);

        let report = ComparisonReport::new(
            ReportView::Compare,
            vec![
                ok("AAPL"),
                with_issue,
                ComparisonResult::halted(
                    "TSLA",
                    SymbolError::ShapeMismatch {
                        reason: "one output".to_string(),
                    },
                ),
                ok("NVDA"),
            ],
        );

        assert!((report.success_rate() - 0.75).abs() < f64::EPSILON);
        assert!(!report.is_complete());
        assert_eq!(report.symbols(), vec!["AAPL", "MSFT", "TSLA", "NVDA"]);
        assert!(report.get("msft").unwrap().succeeded());
        assert!(!report.get("MSFT").unwrap().is_complete());
        assert!(report.get("GOOG").is_none());
    }

    #[test]
    fn test_empty_report() {
        let report = ComparisonReport::new(ReportView::Single, Vec::new());
        assert_eq!(report.success_rate(), 0.0);
    }

    #[test]
    fn test_halted_result_serializes_error() {
        let result = ComparisonResult::halted("AAPL", SymbolError::DataFetchEmpty);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error"]["kind"], "data_fetch_empty");
        assert_eq!(json["series"]["status"], "no_data");
        assert!(json["narratives"].is_null());
    }
}

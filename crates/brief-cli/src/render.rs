//! Text rendering of comparison reports

use brief_stock::{ComparisonReport, ComparisonResult, ExtractedMetrics, SeriesReport};
use comfy_table::{Table, presets::UTF8_FULL};

/// Trailing aligned rows shown per symbol
const RECENT_ROWS: usize = 5;

const NOT_AVAILABLE: &str = "N/A";

pub fn render_report(report: &ComparisonReport) -> String {
    let mut out = String::new();

    if report.results.len() > 1 {
        out.push_str(&overview_table(report).to_string());
        out.push_str("\n\n");
    }

    for result in &report.results {
        out.push_str(&render_result(result));
        out.push('\n');
    }

    out
}

fn overview_table(report: &ComparisonReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Symbol",
        "Current Price (USD)",
        "Daily Change",
        "Trading Volume",
        "Status",
    ]);

    for result in &report.results {
        table.add_row(vec![
            result.symbol.clone(),
            format_price(result.metrics.price),
            format_change(result.metrics.change, result.metrics.percent_change),
            format_volume(result.metrics.volume),
            status(result),
        ]);
    }

    table
}

fn status(result: &ComparisonResult) -> String {
    match (&result.error, result.issues.len()) {
        (Some(_), _) => "failed".to_string(),
        (None, 0) => "ok".to_string(),
        (None, n) => format!("ok ({n} issue(s))"),
    }
}

pub fn render_result(result: &ComparisonResult) -> String {
    let mut out = format!("== {} ==\n", result.symbol);

    if let Some(error) = &result.error {
        out.push_str(&format!("Error: {error}\n"));
        return out;
    }

    out.push_str(&metrics_table(&result.metrics).to_string());
    out.push('\n');

    if let Some(narratives) = &result.narratives {
        out.push_str("\nKey Observations\n");
        out.push_str(narratives.performance.trim());
        out.push_str("\n\nStrategic Recommendation\n");
        out.push_str(narratives.recommendation.trim());
        out.push('\n');
    }

    match &result.series {
        SeriesReport::Ready(analysis) => {
            let mut table = Table::new();
            let mut header = vec!["Date".to_string(), "Close".to_string()];
            header.extend(
                analysis
                    .moving_averages
                    .iter()
                    .map(|ma| format!("MA{}", ma.window)),
            );
            table.load_preset(UTF8_FULL).set_header(header);

            let skip = analysis.aligned.len().saturating_sub(RECENT_ROWS);
            for row in analysis.aligned.iter().skip(skip) {
                let mut cells = vec![row.date.to_string(), format!("{:.2}", row.close)];
                cells.extend(row.averages.iter().map(|v| format!("{v:.2}")));
                table.add_row(cells);
            }

            out.push_str("\nPrice History\n");
            if analysis.aligned.is_empty() {
                out.push_str("Not enough history for the configured moving averages\n");
            } else {
                out.push_str(&table.to_string());
                out.push('\n');
            }
        }
        SeriesReport::NoData => out.push_str("\nPrice History\nNo data available\n"),
    }

    if !result.news.is_empty() {
        out.push_str("\nRecent News\n");
        for item in &result.news {
            let title = item.title.as_deref().unwrap_or("(untitled)");
            out.push_str(&format!("- {title}"));
            if let Some(publisher) = &item.publisher {
                out.push_str(&format!(" ({publisher})"));
            }
            if let Some(link) = &item.link {
                out.push_str(&format!("\n  {link}"));
            }
            out.push('\n');
        }
    }

    for issue in &result.issues {
        out.push_str(&format!("Warning: {issue}\n"));
    }

    out
}

fn metrics_table(metrics: &ExtractedMetrics) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Metric", "Value"])
        .add_row(vec!["Current Price (USD)".to_string(), format_price(metrics.price)])
        .add_row(vec![
            "Daily Change".to_string(),
            format_change(metrics.change, metrics.percent_change),
        ])
        .add_row(vec!["Trading Volume".to_string(), format_volume(metrics.volume)]);
    table
}

pub fn format_price(price: Option<f64>) -> String {
    price.map_or_else(|| NOT_AVAILABLE.to_string(), |p| format!("${p:.2}"))
}

pub fn format_change(change: Option<f64>, percent: Option<f64>) -> String {
    match (change, percent) {
        (Some(change), Some(percent)) => format!("${change:.2} ({percent:.2}%)"),
        (Some(change), None) => format!("${change:.2}"),
        (None, Some(percent)) => format!("{percent:.2}%"),
        (None, None) => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_volume(volume: Option<u64>) -> String {
    let Some(volume) = volume else {
        return NOT_AVAILABLE.to_string();
    };

    let digits = volume.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_stock::analysis::{AlignedRow, ClosePoint, MovingAverageSeries, SeriesAnalysis};
    use brief_stock::{Narratives, NewsItem, ReportView, SymbolError};
    use chrono::NaiveDate;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(172.35)), "$172.35");
        assert_eq!(format_price(Some(5.0)), "$5.00");
        assert_eq!(format_price(None), "N/A");
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(Some(1.2), Some(0.7)), "$1.20 (0.70%)");
        assert_eq!(format_change(Some(1.2), None), "$1.20");
        assert_eq!(format_change(None, Some(0.7)), "0.70%");
        assert_eq!(format_change(None, None), "N/A");
    }

    #[test]
    fn test_format_volume() {
        assert_eq!(format_volume(Some(12_345_678)), "12,345,678");
        assert_eq!(format_volume(Some(1_000)), "1,000");
        assert_eq!(format_volume(Some(999)), "999");
        assert_eq!(format_volume(Some(0)), "0");
        assert_eq!(format_volume(None), "N/A");
    }

    fn sample_result() -> ComparisonResult {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let narratives = Narratives {
            performance: "Price is 172.35 USD".to_string(),
            recommendation: "Hold".to_string(),
        };
        let metrics = ExtractedMetrics {
            price: Some(172.35),
            ..ExtractedMetrics::default()
        };

        let mut result = ComparisonResult::new("AAPL", narratives, metrics);
        result.series = SeriesReport::Ready(SeriesAnalysis {
            prices: Vec::new(),
            closes: vec![ClosePoint { date, close: 172.35 }],
            volumes: Vec::new(),
            moving_averages: vec![MovingAverageSeries {
                window: 1,
                points: vec![ClosePoint { date, close: 172.35 }],
            }],
            aligned: vec![AlignedRow {
                date,
                close: 172.35,
                averages: vec![172.35],
            }],
        });
        result.news = vec![NewsItem {
            title: Some("Apple ships".to_string()),
            link: Some("https://news.test/apple".to_string()),
            publisher: None,
        }];
        result.add_issue(SymbolError::NewsFetch {
            reason: "partial".to_string(),
        });
        result
    }

    #[test]
    fn test_render_result_sections() {
        let text = render_result(&sample_result());

        assert!(text.starts_with("== AAPL =="));
        assert!(text.contains("$172.35"));
        assert!(text.contains("Key Observations"));
        assert!(text.contains("Strategic Recommendation\nHold"));
        assert!(text.contains("MA1"));
        assert!(text.contains("2024-03-01"));
        assert!(text.contains("- Apple ships\n  https://news.test/apple"));
        assert!(text.contains("Warning:"));
    }

    #[test]
    fn test_render_halted_result() {
        let result = ComparisonResult::halted(
            "MSFT",
            SymbolError::ShapeMismatch {
                reason: "expected 2 task outputs, found 1".to_string(),
            },
        );
        let text = render_result(&result);
        assert!(text.contains("Error:"));
        assert!(!text.contains("Key Observations"));
    }

    #[test]
    fn test_render_report_overview_only_for_many() {
        let single = ComparisonReport::new(ReportView::Single, vec![sample_result()]);
        assert!(!render_report(&single).contains("Status"));

        let mut other = sample_result();
        other.symbol = "MSFT".to_string();
        let compare = ComparisonReport::new(ReportView::Compare, vec![sample_result(), other]);
        let text = render_report(&compare);
        assert!(text.contains("Status"));
        assert!(text.contains("ok (1 issue(s))"));
    }
}

//! Per-symbol analysis stages
//!
//! Each stage is synchronous and pure; collaborator I/O happens in the
//! engine before these run.

pub mod extract;
pub mod news;
pub mod series;
pub mod table;

pub use extract::{ExtractedMetrics, MetricExtractor};
pub use news::{NewsItem, RawNewsItem, summarize_news};
pub use series::{
    AlignedRow, ClosePoint, MovingAverageSeries, PricePoint, SeriesAnalysis, SeriesReport,
    TimeSeriesAnalyzer, VolumePoint,
};
pub use table::{ColumnLabel, RawColumn, RawTable};

//! Price series normalization and moving averages

use chrono::NaiveDate;
use serde::Serialize;
use ta::{Next, indicators::SimpleMovingAverage};

use super::table::{RawTable, SchemaMatch};
use crate::error::{Result, StockError, SymbolError};

/// A dated closing price
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClosePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// A dated traded volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VolumePoint {
    pub date: NaiveDate,
    pub volume: u64,
}

/// One row of the price series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: Option<u64>,
}

/// Simple moving average over a fixed trailing window
///
/// Only dates with a full window of history appear.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageSeries {
    pub window: usize,
    pub points: Vec<ClosePoint>,
}

impl MovingAverageSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Close plus every moving average on a date where all are defined
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub close: f64,
    /// One value per configured window, in window order
    pub averages: Vec<f64>,
}

/// Normalized series for one symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesAnalysis {
    pub prices: Vec<PricePoint>,
    pub closes: Vec<ClosePoint>,
    pub volumes: Vec<VolumePoint>,
    pub moving_averages: Vec<MovingAverageSeries>,
    /// Inner-aligned chart view
    pub aligned: Vec<AlignedRow>,
}

impl SeriesAnalysis {
    pub fn moving_average(&self, window: usize) -> Option<&MovingAverageSeries> {
        self.moving_averages.iter().find(|ma| ma.window == window)
    }

    pub fn latest(&self) -> Option<&AlignedRow> {
        self.aligned.last()
    }
}

/// Outcome of analyzing one table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeriesReport {
    /// Nothing to chart
    NoData,
    Ready(SeriesAnalysis),
}

impl SeriesReport {
    pub fn analysis(&self) -> Option<&SeriesAnalysis> {
        match self {
            Self::Ready(analysis) => Some(analysis),
            Self::NoData => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Turns raw tables into close/volume series and moving averages
///
/// Rows are put in date order before averaging, whatever order the
/// collaborator returned them in.
#[derive(Debug, Clone)]
pub struct TimeSeriesAnalyzer {
    windows: Vec<usize>,
}

impl TimeSeriesAnalyzer {
    pub fn new(windows: impl Into<Vec<usize>>) -> Result<Self> {
        let windows = windows.into();
        if windows.is_empty() || windows.contains(&0) {
            return Err(StockError::ConfigError(format!(
                "moving-average windows must be non-empty and positive, got {windows:?}"
            )));
        }
        Ok(Self { windows })
    }

    pub fn windows(&self) -> &[usize] {
        &self.windows
    }

    /// Analyze a table
    ///
    /// An empty table is `Ok(NoData)`; a table without recognizable close
    /// and volume columns is `SchemaNotRecognized`.
    pub fn analyze(&self, table: &RawTable) -> std::result::Result<SeriesReport, SymbolError> {
        if table.is_empty() {
            return Ok(SeriesReport::NoData);
        }

        let schema = table
            .match_schema()
            .map_err(|missing| SymbolError::SchemaNotRecognized { missing })?;

        let (prices, closes, volumes) = normalize(table, schema);
        let moving_averages: Vec<MovingAverageSeries> = self
            .windows
            .iter()
            .map(|&window| simple_moving_average(&closes, window))
            .collect();
        let aligned = align(&closes, &moving_averages);

        Ok(SeriesReport::Ready(SeriesAnalysis {
            prices,
            closes,
            volumes,
            moving_averages,
            aligned,
        }))
    }
}

fn normalize(
    table: &RawTable,
    schema: SchemaMatch,
) -> (Vec<PricePoint>, Vec<ClosePoint>, Vec<VolumePoint>) {
    let close_values = &table.columns()[schema.close].values;
    let volume_values = &table.columns()[schema.volume].values;

    let dates = table.dates();
    let mut rows: Vec<usize> = (0..dates.len()).collect();
    rows.sort_by_key(|&i| dates[i]);
    // A repeated date keeps its last row
    rows.dedup_by(|later, earlier| {
        if dates[*later] == dates[*earlier] {
            *earlier = *later;
            true
        } else {
            false
        }
    });

    let mut prices = Vec::new();
    let mut closes = Vec::new();
    let mut volumes = Vec::new();

    for i in rows {
        let date = dates[i];
        let close = close_values[i].filter(|v| v.is_finite());
        let volume = volume_values[i]
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.round() as u64);

        if let Some(volume) = volume {
            volumes.push(VolumePoint { date, volume });
        }
        if let Some(close) = close {
            closes.push(ClosePoint { date, close });
            prices.push(PricePoint {
                date,
                close,
                volume,
            });
        }
    }

    (prices, closes, volumes)
}

/// Trailing mean, emitted only once `window` samples have been seen
pub fn simple_moving_average(closes: &[ClosePoint], window: usize) -> MovingAverageSeries {
    let points = match SimpleMovingAverage::new(window) {
        Ok(mut sma) => closes
            .iter()
            .enumerate()
            .map(|(i, point)| (i, point.date, sma.next(point.close)))
            .filter(|(i, _, _)| i + 1 >= window)
            .map(|(_, date, close)| ClosePoint { date, close })
            .collect(),
        // Only a zero window is rejected, and the analyzer never holds one
        Err(_) => Vec::new(),
    };

    MovingAverageSeries { window, points }
}

fn align(closes: &[ClosePoint], averages: &[MovingAverageSeries]) -> Vec<AlignedRow> {
    let longest = averages.iter().map(|ma| ma.window).max().unwrap_or(1);

    closes
        .iter()
        .enumerate()
        .skip(longest.saturating_sub(1))
        .map(|(i, point)| AlignedRow {
            date: point.date,
            close: point.close,
            averages: averages
                .iter()
                .map(|ma| ma.points[i + 1 - ma.window].close)
                .collect(),
        })
        .collect()
}

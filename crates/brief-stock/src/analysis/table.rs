//! Raw market-data tables and schema normalization
//!
//! Market-data clients hand back column-oriented tables whose labels are
//! either flat (`"Close"`) or hierarchical (`["Close", "AAPL"]`, as produced
//! when a download is keyed by field and ticker). Normalization is one rule,
//! applied once per table:
//!
//! 1. flatten every label by joining its parts with `_`;
//! 2. the close column is the first label containing `"Close"`, the volume
//!    column the first label containing `"Volume"`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StockError};

pub const CLOSE_MARKER: &str = "Close";
pub const VOLUME_MARKER: &str = "Volume";

/// Column label, flat or multi-level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnLabel {
    Flat(String),
    Levels(Vec<String>),
}

impl ColumnLabel {
    /// Single-string form of the label
    pub fn flatten(&self) -> String {
        match self {
            Self::Flat(label) => label.clone(),
            Self::Levels(parts) => parts.join("_"),
        }
    }
}

impl From<&str> for ColumnLabel {
    fn from(label: &str) -> Self {
        Self::Flat(label.to_string())
    }
}

impl From<Vec<String>> for ColumnLabel {
    fn from(parts: Vec<String>) -> Self {
        Self::Levels(parts)
    }
}

/// One column of a raw table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawColumn {
    pub label: ColumnLabel,
    pub values: Vec<Option<f64>>,
}

/// Date-indexed, column-oriented market data
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawTable {
    dates: Vec<NaiveDate>,
    columns: Vec<RawColumn>,
}

/// Positions of the close and volume columns after flattening
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaMatch {
    pub close: usize,
    pub volume: usize,
}

impl RawTable {
    /// Table with a date index and no columns yet
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            columns: Vec::new(),
        }
    }

    /// Table with no rows and no columns
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a column; it must carry one value per date
    pub fn with_column(
        mut self,
        label: impl Into<ColumnLabel>,
        values: Vec<Option<f64>>,
    ) -> Result<Self> {
        let label = label.into();
        if values.len() != self.dates.len() {
            return Err(StockError::InvalidTable(format!(
                "column '{}' has {} values for {} dates",
                label.flatten(),
                values.len(),
                self.dates.len()
            )));
        }
        self.columns.push(RawColumn { label, values });
        Ok(self)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Flattened labels in column order
    pub fn flat_labels(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.label.flatten()).collect()
    }

    /// Locate the close and volume columns
    ///
    /// On failure, returns the markers that matched no column.
    pub fn match_schema(&self) -> std::result::Result<SchemaMatch, Vec<String>> {
        let labels = self.flat_labels();
        let find = |marker: &str| labels.iter().position(|l| l.contains(marker));

        match (find(CLOSE_MARKER), find(VOLUME_MARKER)) {
            (Some(close), Some(volume)) => Ok(SchemaMatch { close, volume }),
            (close, volume) => {
                let mut missing = Vec::new();
                if close.is_none() {
                    missing.push(CLOSE_MARKER.to_string());
                }
                if volume.is_none() {
                    missing.push(VOLUME_MARKER.to_string());
                }
                Err(missing)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect()
    }

    fn levels(parts: &[&str]) -> ColumnLabel {
        ColumnLabel::Levels(parts.iter().map(|p| (*p).to_string()).collect())
    }

    #[test]
    fn test_flatten_labels() {
        assert_eq!(ColumnLabel::from("Close").flatten(), "Close");
        assert_eq!(levels(&["Close", "AAPL"]).flatten(), "Close_AAPL");
        assert_eq!(levels(&["Adj Close", "MSFT", "x"]).flatten(), "Adj Close_MSFT_x");
    }

    #[test]
    fn test_match_hierarchical_schema() {
        let table = RawTable::new(dates(2))
            .with_column(levels(&["Open", "AAPL"]), vec![Some(1.0), Some(2.0)])
            .unwrap()
            .with_column(levels(&["Close", "AAPL"]), vec![Some(1.5), Some(2.5)])
            .unwrap()
            .with_column(levels(&["Volume", "AAPL"]), vec![Some(10.0), Some(20.0)])
            .unwrap();

        assert_eq!(
            table.match_schema(),
            Ok(SchemaMatch {
                close: 1,
                volume: 2
            })
        );
    }

    #[test]
    fn test_first_close_column_wins() {
        let table = RawTable::new(dates(1))
            .with_column("Adj Close", vec![Some(1.0)])
            .unwrap()
            .with_column("Close", vec![Some(2.0)])
            .unwrap()
            .with_column("Volume", vec![Some(3.0)])
            .unwrap();

        assert_eq!(table.match_schema().unwrap().close, 0);
    }

    #[test]
    fn test_missing_columns_reported() {
        let table = RawTable::new(dates(1))
            .with_column("Open", vec![Some(1.0)])
            .unwrap();
        assert_eq!(
            table.match_schema(),
            Err(vec!["Close".to_string(), "Volume".to_string()])
        );

        let table = table.with_column("Close", vec![Some(1.0)]).unwrap();
        assert_eq!(table.match_schema(), Err(vec!["Volume".to_string()]));
    }

    #[test]
    fn test_column_length_validated() {
        let result = RawTable::new(dates(3)).with_column("Close", vec![Some(1.0)]);
        assert!(matches!(result, Err(StockError::InvalidTable(_))));
    }

    #[test]
    fn test_empty_table() {
        let table = RawTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
    }
}

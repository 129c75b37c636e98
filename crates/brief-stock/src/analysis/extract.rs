//! Metric extraction from performance narratives
//!
//! The narrative is free text, so every rule is a single-line pattern and a
//! miss simply leaves the field empty:
//!
//! | field            | anchor                                         |
//! |------------------|------------------------------------------------|
//! | `price`          | number (thousands separators allowed) + `USD`  |
//! | `change`         | first number after `price change` on the line  |
//! | `percent_change` | `(<number>%)`                                  |
//! | `volume`         | integer after `trading volume of`              |

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

// `[ \t]` rather than `\s` keeps every match on one line.
const PRICE_PATTERN: &str = r"(\d{1,3}(?:,\d{3})+|\d+)(\.\d+)?[ \t]*USD";
const CHANGE_PATTERN: &str = r"price change.*?(\d+(?:\.\d+)?)";
const PERCENT_PATTERN: &str = r"\((\d*\.?\d+)%\)";
const VOLUME_PATTERN: &str = r"trading volume of[ \t]*(\d[\d,]*)";

/// Numeric facts recovered from a performance narrative
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMetrics {
    pub price: Option<f64>,
    pub change: Option<f64>,
    pub percent_change: Option<f64>,
    pub volume: Option<u64>,
}

impl ExtractedMetrics {
    /// Names of the fields no pattern matched
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.price.is_none() {
            missing.push("price");
        }
        if self.change.is_none() {
            missing.push("change");
        }
        if self.percent_change.is_none() {
            missing.push("percent_change");
        }
        if self.volume.is_none() {
            missing.push("volume");
        }
        missing
    }

    pub fn is_empty(&self) -> bool {
        self.missing_fields().len() == 4
    }
}

/// Pattern-based extractor, compiled once and shared across pipelines
#[derive(Debug, Clone)]
pub struct MetricExtractor {
    price: Regex,
    change: Regex,
    percent: Regex,
    volume: Regex,
}

impl MetricExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            price: Regex::new(PRICE_PATTERN)?,
            change: Regex::new(CHANGE_PATTERN)?,
            percent: Regex::new(PERCENT_PATTERN)?,
            volume: Regex::new(VOLUME_PATTERN)?,
        })
    }

    /// Extract all four metrics; unmatched fields stay `None`
    pub fn extract(&self, narrative: &str) -> ExtractedMetrics {
        let metrics = ExtractedMetrics {
            price: self.price(narrative),
            change: first_capture(&self.change, narrative).and_then(parse_decimal),
            percent_change: first_capture(&self.percent, narrative).and_then(parse_decimal),
            volume: first_capture(&self.volume, narrative).and_then(parse_integer),
        };

        let missing = metrics.missing_fields();
        if !missing.is_empty() {
            tracing::debug!("Narrative left metrics unmatched: {}", missing.join(", "));
        }

        metrics
    }

    fn price(&self, narrative: &str) -> Option<f64> {
        let caps = self.price.captures(narrative)?;
        let whole = caps.get(1)?.as_str();
        let fraction = caps.get(2).map_or("", |m| m.as_str());
        parse_decimal(&format!("{whole}{fraction}"))
    }
}

fn first_capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)?.get(1).map(|m| m.as_str())
}

fn strip_separators(raw: &str) -> String {
    raw.chars().filter(|c| *c != ',').collect()
}

fn parse_decimal(raw: &str) -> Option<f64> {
    strip_separators(raw)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn parse_integer(raw: &str) -> Option<u64> {
    strip_separators(raw).parse::<u64>().ok()
}

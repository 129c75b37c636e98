//! Per-symbol pipelines and multi-symbol comparison

pub mod orchestrator;
pub mod result;
pub mod symbols;

pub use orchestrator::ComparisonOrchestrator;
pub use result::{ComparisonReport, ComparisonResult};
pub use symbols::normalize_symbols;

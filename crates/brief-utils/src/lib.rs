//! Shared utilities for stock-brief
//!
//! This crate provides common functionality used across the stock-brief workspace,
//! including logging setup and configuration loading helpers.

pub mod config;
pub mod logging;

pub use config::{ConfigError, env_override, load_json_file};
pub use logging::{LogFormat, init_tracing, init_tracing_with};

//! Command-line interface for stock briefs
//!
//! # Usage
//!
//! ```bash
//! # Generation service and news credentials (or put them in .env)
//! export CREW_API_URL="http://localhost:8000/kickoff"
//! export FINNHUB_API_KEY="..."
//!
//! stock-brief analyze TSLA
//! stock-brief compare AAPL MSFT NVDA --format json
//! ```

mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use brief_stock::api::{CrewClient, FinnhubClient, YahooFinanceClient};
use brief_stock::{ComparisonOrchestrator, StockConfig};
use brief_utils::{LogFormat, init_tracing_with};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stock-brief")]
#[command(about = "Stock performance briefs and side-by-side comparisons", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// JSON config file; environment variables override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Brief for a single symbol
    Analyze {
        #[arg(default_value = "AAPL")]
        symbol: String,
    },
    /// Compare several symbols
    Compare {
        #[arg(required = true, num_args = 1.., value_delimiter = ',')]
        symbols: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<StockConfig> {
    let config = match path {
        Some(path) => StockConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => StockConfig::default(),
    };
    let config = config.with_env()?;
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_format = if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::from_env()
    };
    init_tracing_with(log_format, "warn,brief_stock=info,stock_brief=info");

    let config = Arc::new(load_config(args.config.as_ref())?);

    let orchestrator = ComparisonOrchestrator::new(
        Arc::clone(&config),
        Arc::new(CrewClient::from_config(&config)?),
        Arc::new(YahooFinanceClient::new()),
        Arc::new(FinnhubClient::from_config(&config)),
    )?;

    let report = match &args.command {
        Command::Analyze { symbol } => {
            info!("Analyzing {}", symbol);
            orchestrator.analyze(symbol).await?
        }
        Command::Compare { symbols } => {
            info!("Comparing {}", symbols.join(", "));
            orchestrator.compare(symbols.as_slice()).await?
        }
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print!("{}", render::render_report(&report)),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze_default_symbol() {
        let args = Args::try_parse_from(["stock-brief", "analyze"]).unwrap();
        assert!(matches!(args.command, Command::Analyze { ref symbol } if symbol == "AAPL"));
        assert_eq!(args.format, OutputFormat::Table);
    }

    #[test]
    fn test_parse_compare_accepts_commas_and_spaces() {
        let args = Args::try_parse_from([
            "stock-brief",
            "compare",
            "aapl,msft",
            "nvda",
            "--format",
            "json",
        ])
        .unwrap();
        match args.command {
            Command::Compare { symbols } => assert_eq!(symbols, vec!["aapl", "msft", "nvda"]),
            Command::Analyze { .. } => panic!("expected compare"),
        }
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_compare_requires_symbols() {
        assert!(Args::try_parse_from(["stock-brief", "compare"]).is_err());
    }
}

//! CLI definitions.

pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "signalsim")]
#[command(author, version, about = "Backtest replay and Monte Carlo forecasts for EGX trade signals")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay past recommendations against historical prices
    Backtest(BacktestArgs),
    /// Project a terminal-value distribution for one instrument
    Forecast(ForecastArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    /// Starting amount in currency units
    #[arg(short, long)]
    pub amount: Decimal,

    /// Start date (YYYY-MM-DD), at most two years back
    #[arg(long)]
    pub start: NaiveDate,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: String,

    /// Save results to file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ForecastArgs {
    /// Instrument symbol, or "auto" to rank the candidate universe
    #[arg(short, long, default_value = "auto")]
    pub symbol: String,

    /// Investment amount in currency units
    #[arg(short, long, default_value = "100000")]
    pub amount: f64,

    /// Projection horizon in trading days (config default when omitted)
    #[arg(long)]
    pub horizon: Option<u32>,

    /// Scenario: base, bull, or bear (config default when omitted)
    #[arg(long)]
    pub scenario: Option<String>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: String,

    /// Save results to file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

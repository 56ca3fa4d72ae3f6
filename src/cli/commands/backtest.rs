//! Backtest command implementation.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use signalsim_backtest::{BacktestService, ReplayConfig};
use signalsim_core::BacktestRequest;
use signalsim_data::{CsvPriceRepository, CsvRecommendationRepository};

use crate::cli::BacktestArgs;

use super::{instrument_repo, load_or_default};

pub async fn run(args: BacktestArgs, config_path: &Path) -> Result<()> {
    let config = load_or_default(config_path)?;
    info!(amount = %args.amount, start = %args.start, "starting backtest");

    let prices = CsvPriceRepository::new(&config.data.prices_dir)
        .with_context(|| format!("price directory {}", config.data.prices_dir))?;
    let recommendations = CsvRecommendationRepository::new(&config.data.recommendations_file)
        .with_context(|| format!("recommendation file {}", config.data.recommendations_file))?;

    let replay_config = ReplayConfig {
        holding_period_days: config.backtest.holding_period_days,
        max_positions: config.backtest.max_positions,
        cash_reserve: config.backtest.cash_reserve_pct / Decimal::ONE_HUNDRED,
        max_position: config.backtest.max_position_pct / Decimal::ONE_HUNDRED,
        ..ReplayConfig::default()
    };

    let service = BacktestService::new(
        Arc::new(prices),
        Arc::new(recommendations),
        instrument_repo(&config.data),
        config.backtest.benchmark_symbol.clone(),
    )
    .with_config(replay_config);

    let request = BacktestRequest {
        amount: args.amount,
        start_date: args.start,
    };
    let result = service.run(&request).await?;

    // Output results
    match args.output.as_str() {
        "json" => println!("{}", result.to_json()?),
        _ => println!("{}", result.summary()),
    }

    // Save if requested
    if let Some(save_path) = &args.save {
        std::fs::write(save_path, result.to_json()?)?;
        info!("Results saved to {:?}", save_path);
    }

    Ok(())
}

//! Forecast command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use signalsim_core::{ForecastRequest, Scenario, SymbolChoice};
use signalsim_data::CsvPriceRepository;
use signalsim_forecast::ForecastService;

use crate::cli::ForecastArgs;

use super::{instrument_repo, load_or_default};

pub async fn run(args: ForecastArgs, config_path: &Path) -> Result<()> {
    let config = load_or_default(config_path)?;

    let horizon_days = args
        .horizon
        .unwrap_or(config.forecast.default_horizon_days);
    let scenario: Scenario = args
        .scenario
        .as_deref()
        .unwrap_or(&config.forecast.default_scenario)
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    info!(symbol = %args.symbol, horizon_days, %scenario, "starting forecast");

    let prices = CsvPriceRepository::new(&config.data.prices_dir)
        .with_context(|| format!("price directory {}", config.data.prices_dir))?;
    let service = ForecastService::new(Arc::new(prices), instrument_repo(&config.data));

    let request = ForecastRequest {
        symbol: SymbolChoice::parse(&args.symbol),
        amount: args.amount,
        horizon_days,
        scenario,
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

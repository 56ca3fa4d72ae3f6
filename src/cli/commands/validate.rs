//! Validate configuration command.

use anyhow::Result;
use signalsim_config::load_config;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Prices dir: {}", config.data.prices_dir);
            println!("Benchmark: {}", config.backtest.benchmark_symbol);
            println!("Holding period: {} days", config.backtest.holding_period_days);
            println!("Max positions: {}", config.backtest.max_positions);
            println!("Cash reserve: {}%", config.backtest.cash_reserve_pct);
            println!("Default horizon: {} days", config.forecast.default_horizon_days);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}

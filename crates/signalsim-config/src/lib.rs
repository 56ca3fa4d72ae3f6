//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, BacktestSettings, DataSettings, ForecastSettings, LoggingConfig,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("SIGNALSIM")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.backtest.benchmark_symbol, "EGX30");
        assert_eq!(config.backtest.holding_period_days, 10);
        assert_eq!(config.forecast.default_horizon_days, 252);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(
            b"[app]\nname = \"signalsim\"\nenvironment = \"production\"\n\n\
              [logging]\nlevel = \"debug\"\nformat = \"json\"\n\n\
              [backtest]\nbenchmark_symbol = \"EGX70\"\nholding_period_days = 15\n\
              max_positions = 8\ncash_reserve_pct = 5\nmax_position_pct = 20\n",
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.app.environment, "production");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.backtest.benchmark_symbol, "EGX70");
        assert_eq!(config.backtest.max_positions, 8);
        // Sections absent from the file fall back to defaults.
        assert_eq!(config.forecast.default_scenario, "base");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let _ = NamedTempFile::new().unwrap();
        assert!(load_config(Path::new("/nonexistent/config.toml")).is_err());
    }
}

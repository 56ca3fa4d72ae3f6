//! Configuration structures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub backtest: BacktestSettings,
    #[serde(default)]
    pub forecast: ForecastSettings,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "signalsim".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Local data file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    /// Directory of per-symbol `{symbol}.csv` price files
    pub prices_dir: String,
    /// Exported recommendation history
    pub recommendations_file: String,
    /// Instrument display names, optional
    pub instruments_file: Option<String>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            prices_dir: "data/prices".to_string(),
            recommendations_file: "data/recommendations.csv".to_string(),
            instruments_file: None,
        }
    }
}

/// Backtest replay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestSettings {
    pub benchmark_symbol: String,
    pub holding_period_days: u32,
    pub max_positions: usize,
    pub cash_reserve_pct: Decimal,
    pub max_position_pct: Decimal,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        use rust_decimal_macros::dec;
        Self {
            benchmark_symbol: "EGX30".to_string(),
            holding_period_days: 10,
            max_positions: 10,
            cash_reserve_pct: dec!(10),
            max_position_pct: dec!(25),
        }
    }
}

/// Forecast settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSettings {
    pub default_horizon_days: u32,
    pub default_scenario: String,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            default_horizon_days: 252,
            default_scenario: "base".to_string(),
        }
    }
}

//! Validated simulation requests.
//!
//! All range checks happen here, before any fetch or computation, so
//! the engines only ever see well-formed inputs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::types::Scenario;

const BACKTEST_MIN_AMOUNT: Decimal = dec!(5_000);
const BACKTEST_MAX_AMOUNT: Decimal = dec!(10_000_000);
const BACKTEST_MAX_LOOKBACK_DAYS: i64 = 2 * 365;

const FORECAST_MIN_AMOUNT: f64 = 1_000.0;
const FORECAST_MAX_AMOUNT: f64 = 100_000_000.0;
const FORECAST_MIN_HORIZON: u32 = 5;
const FORECAST_MAX_HORIZON: u32 = 1825;

/// Parameters for a historical replay run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestRequest {
    /// Starting cash in currency units
    pub amount: Decimal,
    /// First simulated calendar date
    pub start_date: NaiveDate,
}

impl BacktestRequest {
    /// Validate against `today` (injected for testability).
    pub fn validate(&self, today: NaiveDate) -> SimResult<()> {
        if self.amount < BACKTEST_MIN_AMOUNT || self.amount > BACKTEST_MAX_AMOUNT {
            return Err(SimError::Validation(format!(
                "amount must be between {BACKTEST_MIN_AMOUNT} and {BACKTEST_MAX_AMOUNT}, got {}",
                self.amount
            )));
        }
        if self.start_date >= today {
            return Err(SimError::Validation(format!(
                "start_date {} must be in the past",
                self.start_date
            )));
        }
        if (today - self.start_date).num_days() > BACKTEST_MAX_LOOKBACK_DAYS {
            return Err(SimError::Validation(format!(
                "start_date {} is more than 2 years ago",
                self.start_date
            )));
        }
        Ok(())
    }
}

/// Instrument selection for a forecast request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolChoice {
    /// Pick the most attractive instrument from the candidate universe
    Auto,
    /// Forecast one specific instrument
    Symbol(String),
}

impl SymbolChoice {
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("auto") {
            SymbolChoice::Auto
        } else {
            SymbolChoice::Symbol(raw.to_string())
        }
    }
}

/// Parameters for a Monte Carlo forecast run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub symbol: SymbolChoice,
    /// Investment amount in currency units
    pub amount: f64,
    /// Projection horizon in trading days
    pub horizon_days: u32,
    pub scenario: Scenario,
}

impl ForecastRequest {
    pub fn validate(&self) -> SimResult<()> {
        if !self.amount.is_finite()
            || self.amount < FORECAST_MIN_AMOUNT
            || self.amount > FORECAST_MAX_AMOUNT
        {
            return Err(SimError::Validation(format!(
                "investment_amount must be between {FORECAST_MIN_AMOUNT} and {FORECAST_MAX_AMOUNT}, got {}",
                self.amount
            )));
        }
        if self.horizon_days < FORECAST_MIN_HORIZON || self.horizon_days > FORECAST_MAX_HORIZON {
            return Err(SimError::Validation(format!(
                "horizon_days must be between {FORECAST_MIN_HORIZON} and {FORECAST_MAX_HORIZON}, got {}",
                self.horizon_days
            )));
        }
        if let SymbolChoice::Symbol(s) = &self.symbol {
            if s.trim().is_empty() {
                return Err(SimError::Validation("symbol must not be empty".into()));
            }
        }
        Ok(())
    }
}

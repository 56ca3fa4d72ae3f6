//! GBM parameter estimation from daily log returns.

use serde::{Deserialize, Serialize};

use signalsim_core::{PriceSeries, SimError, SimResult};

/// Minimum usable price observations per instrument.
pub const MIN_OBSERVATIONS: usize = 60;
/// Minimum usable log returns for a stable estimate.
pub const MIN_LOG_RETURNS: usize = 10;
/// Estimation lookback is capped at five years of trading days.
const MAX_LOOKBACK: usize = 5 * 252;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annualized GBM parameters for one instrument.
///
/// Recomputed on every forecast request; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbmParams {
    pub symbol: String,
    /// Annualized drift
    pub mu: f64,
    /// Annualized volatility
    pub sigma: f64,
    /// Last observed close
    pub last_price: f64,
    /// Observations used for the estimate
    pub data_points: usize,
}

impl GbmParams {
    /// Estimate drift and volatility from a daily close series.
    ///
    /// mu = mean(log returns) * 252; sigma = sqrt(sample-variance * 252).
    pub fn estimate(series: &PriceSeries) -> SimResult<Self> {
        let series = series.tail(MAX_LOOKBACK);
        if series.len() < MIN_OBSERVATIONS {
            return Err(SimError::InsufficientHistory {
                symbol: series.symbol.clone(),
                required: MIN_OBSERVATIONS,
                available: series.len(),
            });
        }

        let returns: Vec<f64> = series
            .log_returns()
            .into_iter()
            .filter(|r| r.is_finite())
            .collect();
        if returns.len() < MIN_LOG_RETURNS {
            return Err(SimError::InsufficientHistory {
                symbol: series.symbol.clone(),
                required: MIN_LOG_RETURNS,
                available: returns.len(),
            });
        }

        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);

        let last_price = series.last().map(|p| p.close).unwrap_or(0.0);

        Ok(Self {
            symbol: series.symbol.clone(),
            mu: mean * TRADING_DAYS_PER_YEAR,
            sigma: (variance * TRADING_DAYS_PER_YEAR).sqrt(),
            last_price,
            data_points: series.len(),
        })
    }
}

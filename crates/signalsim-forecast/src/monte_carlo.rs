//! Terminal-value sampling under the estimated GBM model.

use rand::Rng;
use rand_distr::StandardNormal;
use rayon::prelude::*;
use tracing::debug;

use signalsim_core::Scenario;

use crate::gbm::GbmParams;

/// Independent terminal-value draws per forecast.
pub const NUM_SAMPLES: usize = 5000;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Draw `NUM_SAMPLES` independent terminal portfolio values.
///
/// Uses the closed-form lognormal solution
/// `V = shares * S0 * exp((mu_adj - sigma^2/2) * dt + sigma * sqrt(dt) * Z)`
/// with `dt = horizon/252` and `shares = amount/S0`. The draws are
/// independent, so they run in parallel; only the collect is a
/// synchronization point.
pub fn simulate_terminal_values(
    params: &GbmParams,
    amount: f64,
    horizon_days: u32,
    scenario: Scenario,
) -> Vec<f64> {
    let dt = f64::from(horizon_days) / TRADING_DAYS_PER_YEAR;
    let mu_adj = params.mu + scenario.drift_adjustment();
    let drift_term = (mu_adj - 0.5 * params.sigma * params.sigma) * dt;
    let diffusion = params.sigma * dt.sqrt();

    debug!(
        symbol = %params.symbol,
        mu_adj,
        sigma = params.sigma,
        horizon_days,
        "drawing terminal values"
    );

    (0..NUM_SAMPLES)
        .into_par_iter()
        .map_init(rand::thread_rng, |rng, _| {
            let z: f64 = rng.sample(StandardNormal);
            amount * (drift_term + diffusion * z).exp()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(mu: f64, sigma: f64) -> GbmParams {
        GbmParams {
            symbol: "COMI.CA".into(),
            mu,
            sigma,
            last_price: 70.0,
            data_points: 500,
        }
    }

    #[test]
    fn test_sample_count() {
        let values = simulate_terminal_values(&params(0.1, 0.3), 100_000.0, 252, Scenario::Base);
        assert_eq!(values.len(), NUM_SAMPLES);
    }

    #[test]
    fn test_zero_volatility_is_deterministic() {
        let values = simulate_terminal_values(&params(0.0, 0.0), 100_000.0, 252, Scenario::Base);
        for v in values {
            assert!((v - 100_000.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_scenario_shifts_mean() {
        let base = simulate_terminal_values(&params(0.05, 0.2), 100_000.0, 504, Scenario::Base);
        let bull = simulate_terminal_values(&params(0.05, 0.2), 100_000.0, 504, Scenario::Bull);
        let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
        // +2% annualized drift over two years moves the sample mean up;
        // 5000 draws leave enough noise that we only assert direction.
        assert!(mean(&bull) > mean(&base) * 0.995);
    }

    #[test]
    fn test_mean_matches_lognormal_expectation() {
        // E[V] = amount * exp(mu * dt); with sigma moderate and N=5000
        // the sample mean should land within a few percent.
        let amount = 100_000.0;
        let values = simulate_terminal_values(&params(0.10, 0.25), amount, 252, Scenario::Base);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let expected = amount * (0.10f64).exp();
        assert!(
            (mean - expected).abs() / expected < 0.05,
            "mean {mean} vs expected {expected}"
        );
    }

    #[test]
    fn test_all_values_positive() {
        let values = simulate_terminal_values(&params(-0.5, 0.8), 50_000.0, 1825, Scenario::Bear);
        assert!(values.iter().all(|v| *v > 0.0));
    }
}

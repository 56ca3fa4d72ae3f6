//! Distribution summary of Monte Carlo terminal values.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use signalsim_core::Scenario;

use crate::gbm::GbmParams;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const HISTOGRAM_BINS: usize = 30;

/// Mean, median, and the fixed percentile set over one measure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueStats {
    pub mean: f64,
    pub median: f64,
    pub p5: f64,
    pub p25: f64,
    pub p75: f64,
    pub p95: f64,
}

/// Fixed-width histogram over the observed sample range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin counts; sums to the sample count
    pub counts: Vec<u32>,
    /// Bin edges, `counts.len() + 1` entries spanning min..max
    pub edges: Vec<f64>,
}

/// One step of the analytic confidence band ("fan chart").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandPoint {
    /// Trading days from now
    pub day: u32,
    /// Analytic 5th percentile
    pub worst: f64,
    /// Analytic median
    pub median: f64,
    /// Analytic 95th percentile
    pub best: f64,
}

/// Full summary of a terminal-value sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionSummary {
    /// Statistics of terminal portfolio value
    pub values: ValueStats,
    /// The same statistics expressed as return percentages
    pub returns_pct: ValueStats,
    /// Fraction of samples ending above the initial amount
    pub probability_positive: f64,
    pub histogram: Histogram,
}

impl DistributionSummary {
    /// Summarize raw terminal values against the initial amount.
    pub fn from_samples(samples: &[f64], amount: f64) -> Self {
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let values = ValueStats {
            mean,
            median: percentile(&sorted, 0.50),
            p5: percentile(&sorted, 0.05),
            p25: percentile(&sorted, 0.25),
            p75: percentile(&sorted, 0.75),
            p95: percentile(&sorted, 0.95),
        };
        let to_pct = |v: f64| (v / amount - 1.0) * 100.0;
        let returns_pct = ValueStats {
            mean: to_pct(values.mean),
            median: to_pct(values.median),
            p5: to_pct(values.p5),
            p25: to_pct(values.p25),
            p75: to_pct(values.p75),
            p95: to_pct(values.p95),
        };

        // Ties count half, so a degenerate zero-volatility sample (every
        // value exactly equal to the amount) reports 50% rather than 0%.
        let above = sorted.iter().filter(|v| **v > amount).count() as f64;
        let equal = sorted.iter().filter(|v| **v == amount).count() as f64;
        let probability_positive = (above + 0.5 * equal) / n as f64;

        Self {
            values,
            returns_pct,
            probability_positive,
            histogram: histogram(&sorted),
        }
    }
}

/// Percentile by rank on a pre-sorted slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64 * q) as usize).min(sorted.len() - 1);
    sorted[idx]
}

/// 30-bin histogram spanning the observed min/max.
fn histogram(sorted: &[f64]) -> Histogram {
    let min = sorted.first().copied().unwrap_or(0.0);
    let max = sorted.last().copied().unwrap_or(0.0);
    let mut counts = vec![0u32; HISTOGRAM_BINS];

    let width = (max - min) / HISTOGRAM_BINS as f64;
    if width > 0.0 {
        for &v in sorted {
            let bin = (((v - min) / width) as usize).min(HISTOGRAM_BINS - 1);
            counts[bin] += 1;
        }
    } else {
        // Degenerate range: everything lands in the first bin.
        counts[0] = sorted.len() as u32;
    }

    let edges = (0..=HISTOGRAM_BINS)
        .map(|i| min + width * i as f64)
        .collect();
    Histogram { counts, edges }
}

/// Analytic worst/median/best band at successive time steps.
///
/// Computed from the lognormal quantiles of the GBM model directly, not
/// re-sampled; stepped every `max(1, horizon/252)` trading days.
pub fn band_points(
    params: &GbmParams,
    amount: f64,
    horizon_days: u32,
    scenario: Scenario,
) -> Vec<BandPoint> {
    let normal = Normal::new(0.0, 1.0).expect("unit normal");
    let z_low = normal.inverse_cdf(0.05);
    let z_high = normal.inverse_cdf(0.95);

    let mu_adj = params.mu + scenario.drift_adjustment();
    let value_at = |day: u32, z: f64| {
        let t = f64::from(day) / TRADING_DAYS_PER_YEAR;
        amount * ((mu_adj - 0.5 * params.sigma * params.sigma) * t + params.sigma * t.sqrt() * z).exp()
    };

    let step = (horizon_days / 252).max(1);
    let mut points = Vec::new();
    let mut day = 0;
    while day <= horizon_days {
        points.push(BandPoint {
            day,
            worst: value_at(day, z_low),
            median: value_at(day, 0.0),
            best: value_at(day, z_high),
        });
        day += step;
    }
    if points.last().map(|p| p.day) != Some(horizon_days) {
        points.push(BandPoint {
            day: horizon_days,
            worst: value_at(horizon_days, z_low),
            median: value_at(horizon_days, 0.0),
            best: value_at(horizon_days, z_high),
        });
    }
    points
}

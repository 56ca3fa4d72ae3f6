//! Forward-looking Monte Carlo / GBM forecast engine.
//!
//! Estimates annualized drift and volatility from a price series,
//! projects a terminal-value distribution under geometric Brownian
//! motion, and optionally auto-selects the most attractive instrument
//! from a fixed candidate universe.

mod distribution;
mod gbm;
mod monte_carlo;
mod result;
mod selector;
mod service;
mod universe;

pub use distribution::{band_points, BandPoint, DistributionSummary, Histogram, ValueStats};
pub use gbm::{GbmParams, MIN_LOG_RETURNS, MIN_OBSERVATIONS};
pub use monte_carlo::{simulate_terminal_values, NUM_SAMPLES};
pub use result::{CandidateScore, ForecastResult};
pub use selector::{AutoSelector, CandidateEvaluation, Selection};
pub use service::ForecastService;
pub use universe::CANDIDATE_UNIVERSE;

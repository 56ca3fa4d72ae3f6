//! Historical backtest replay engine.
//!
//! Reconstructs what a portfolio would have earned had it mechanically
//! followed past trade recommendations, and derives summary statistics
//! from the resulting ledger and equity curve.

mod allocation;
mod analytics;
mod engine;
mod result;
mod service;

pub use allocation::{AllocationLadder, AllocationTier};
pub use engine::{ReplayConfig, ReplayEngine, ReplayOutcome};
pub use result::{BenchmarkComparison, MonthlyReturn, RiskMetrics, SimulationResult, TradeSummary};
pub use service::BacktestService;

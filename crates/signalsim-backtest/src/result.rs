//! Backtest result shape and rendering.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use signalsim_core::{ClosedTrade, EquityCurvePoint, InstrumentName};

use crate::analytics::{self, MonthlyBucket};
use crate::engine::ReplayOutcome;

/// Re-exported for callers that only consume the result shape.
pub use crate::analytics::MonthlyBucket as MonthlyReturn;

/// Benchmark comparison block, absent when no index data was available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub return_pct: Decimal,
    pub final_value: Decimal,
    pub alpha_pct: Decimal,
    pub alpha_abs: Decimal,
}

/// Risk and trade statistics for a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub max_drawdown_pct: Decimal,
    pub max_drawdown_date: Option<NaiveDate>,
    pub sharpe_ratio: f64,
    pub win_rate_pct: Decimal,
    pub avg_holding_days: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
}

/// A ledger entry annotated with the instrument's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSummary {
    #[serde(flatten)]
    pub trade: ClosedTrade,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Aggregate output of one backtest run.
///
/// Produced fresh per request; persistence is the caller's decision.
/// Monetary and percentage figures are rounded to 2 decimal places
/// here, at the presentation boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub input_amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Calendar days covered by the run
    pub duration_days: i64,
    pub final_value: Decimal,
    pub total_return_pct: Decimal,
    pub total_return_abs: Decimal,
    pub annualized_return_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<BenchmarkComparison>,
    pub risk_metrics: RiskMetrics,
    pub equity_curve: Vec<EquityCurvePoint>,
    pub top_trades: Vec<TradeSummary>,
    pub worst_trades: Vec<TradeSummary>,
    pub monthly_breakdown: Vec<MonthlyBucket>,
}

impl SimulationResult {
    /// Derive the full result from a raw replay outcome.
    pub fn from_replay(
        outcome: ReplayOutcome,
        names: &HashMap<String, InstrumentName>,
    ) -> Self {
        let initial = outcome.initial_value;
        let final_value = outcome.final_value;
        let total_return_abs = final_value - initial;
        let total_return_pct = if initial > Decimal::ZERO {
            total_return_abs / initial * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };

        let (max_drawdown_pct, max_drawdown_date) = analytics::max_drawdown(&outcome.equity_curve);
        let winning = outcome.trades.iter().filter(|t| t.is_winner()).count();

        let risk_metrics = RiskMetrics {
            max_drawdown_pct: max_drawdown_pct.round_dp(2),
            max_drawdown_date,
            sharpe_ratio: round2(analytics::sharpe_ratio(&outcome.equity_curve)),
            win_rate_pct: analytics::win_rate_pct(&outcome.trades).round_dp(2),
            avg_holding_days: round2(analytics::avg_holding_days(&outcome.trades)),
            total_trades: outcome.trades.len(),
            winning_trades: winning,
            losing_trades: outcome.trades.len() - winning,
        };

        let benchmark = Self::benchmark_comparison(&outcome, initial, final_value, total_return_pct);

        // Closed trades sorted by return descending; top 5 and bottom 5
        // (bottom reversed so the worst trade comes first).
        let mut ranked = outcome.trades.clone();
        ranked.sort_by(|a, b| b.return_pct.cmp(&a.return_pct));
        let top_trades = ranked
            .iter()
            .take(5)
            .map(|t| summarize(t, names))
            .collect();
        let worst_trades = ranked
            .iter()
            .rev()
            .take(5)
            .map(|t| summarize(t, names))
            .collect();

        let monthly = analytics::monthly_breakdown(&outcome.equity_curve, initial)
            .into_iter()
            .map(|mut b| {
                b.return_pct = b.return_pct.round_dp(2);
                b.benchmark_return_pct = b.benchmark_return_pct.map(|p| p.round_dp(2));
                b
            })
            .collect();

        let equity_curve: Vec<EquityCurvePoint> = outcome
            .equity_curve
            .into_iter()
            .map(|mut p| {
                p.value = p.value.round_dp(2);
                p.benchmark = p.benchmark.map(|b| b.round_dp(2));
                p
            })
            .collect();

        Self {
            input_amount: initial,
            start_date: outcome.start_date,
            end_date: outcome.end_date,
            duration_days: (outcome.end_date - outcome.start_date).num_days(),
            final_value: final_value.round_dp(2),
            total_return_pct: total_return_pct.round_dp(2),
            total_return_abs: total_return_abs.round_dp(2),
            annualized_return_pct: round2(analytics::annualized_return_pct(
                initial,
                final_value,
                equity_curve.len(),
            )),
            benchmark,
            risk_metrics,
            equity_curve,
            top_trades,
            worst_trades,
            monthly_breakdown: monthly,
        }
    }

    fn benchmark_comparison(
        outcome: &ReplayOutcome,
        initial: Decimal,
        final_value: Decimal,
        total_return_pct: Decimal,
    ) -> Option<BenchmarkComparison> {
        let bench_final = outcome.equity_curve.iter().rev().find_map(|p| p.benchmark)?;
        if initial <= Decimal::ZERO {
            return None;
        }
        let bench_return_pct = (bench_final - initial) / initial * Decimal::ONE_HUNDRED;
        Some(BenchmarkComparison {
            return_pct: bench_return_pct.round_dp(2),
            final_value: bench_final.round_dp(2),
            alpha_pct: (total_return_pct - bench_return_pct).round_dp(2),
            alpha_abs: (final_value - bench_final).round_dp(2),
        })
    }

    /// Human-readable summary for the CLI.
    pub fn summary(&self) -> String {
        let mut s = String::new();
        s.push_str("═══════════════════════════════════════════════\n");
        s.push_str("              BACKTEST RESULT                   \n");
        s.push_str("═══════════════════════════════════════════════\n");
        s.push_str(&format!("  Period:             {} → {}\n", self.start_date, self.end_date));
        s.push_str(&format!("  Starting Amount:    {:.2}\n", self.input_amount));
        s.push_str(&format!("  Final Value:        {:.2}\n", self.final_value));
        s.push_str(&format!("  Total Return:       {:.2}%\n", self.total_return_pct));
        s.push_str(&format!("  Annualized Return:  {:.2}%\n", self.annualized_return_pct));
        if let Some(bench) = &self.benchmark {
            s.push_str(&format!("  Benchmark Return:   {:.2}%\n", bench.return_pct));
            s.push_str(&format!("  Alpha:              {:.2}%\n", bench.alpha_pct));
        }
        s.push_str(&format!("  Max Drawdown:       {:.2}%\n", self.risk_metrics.max_drawdown_pct));
        s.push_str(&format!("  Sharpe Ratio:       {:.2}\n", self.risk_metrics.sharpe_ratio));
        s.push_str(&format!("  Win Rate:           {:.2}%\n", self.risk_metrics.win_rate_pct));
        s.push_str(&format!(
            "  Trades:             {} ({} won / {} lost)\n",
            self.risk_metrics.total_trades,
            self.risk_metrics.winning_trades,
            self.risk_metrics.losing_trades
        ));
        s.push_str("═══════════════════════════════════════════════\n");
        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn summarize(trade: &ClosedTrade, names: &HashMap<String, InstrumentName>) -> TradeSummary {
    let mut trade = trade.clone();
    trade.return_pct = trade.return_pct.round_dp(2);
    trade.profit = trade.profit.round_dp(2);
    TradeSummary {
        name: names.get(&trade.symbol).map(|n| n.name_primary.clone()),
        trade,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

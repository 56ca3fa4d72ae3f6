//! Performance analytics over a completed replay.
//!
//! Everything here is derived purely from the trade ledger and equity
//! curve; nothing feeds back into the engine.

use chrono::Datelike;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use signalsim_core::{ClosedTrade, EquityCurvePoint};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annualized return percentage: `(final/initial)^(252/days) - 1`.
///
/// `trading_days` is the number of simulated trading days.
pub fn annualized_return_pct(initial: Decimal, final_value: Decimal, trading_days: usize) -> f64 {
    let initial = initial.to_f64().unwrap_or(0.0);
    let final_value = final_value.to_f64().unwrap_or(0.0);
    if initial <= 0.0 || final_value <= 0.0 || trading_days == 0 {
        return 0.0;
    }
    ((final_value / initial).powf(TRADING_DAYS_PER_YEAR / trading_days as f64) - 1.0) * 100.0
}

/// Sharpe ratio from daily equity returns, annualized with sqrt(252).
///
/// Uses the population standard deviation; defined as 0 when fewer than
/// two daily returns exist or the deviation is zero.
pub fn sharpe_ratio(equity_curve: &[EquityCurvePoint]) -> f64 {
    let returns = daily_returns(equity_curve);
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance =
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
    let std_dev = variance.sqrt();
    if std_dev == 0.0 {
        return 0.0;
    }
    mean / std_dev * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Largest peak-to-trough decline and the date it bottomed.
pub fn max_drawdown(equity_curve: &[EquityCurvePoint]) -> (Decimal, Option<chrono::NaiveDate>) {
    let mut peak = Decimal::ZERO;
    let mut worst = Decimal::ZERO;
    let mut worst_date = None;
    for point in equity_curve {
        if point.value > peak {
            peak = point.value;
        }
        if peak > Decimal::ZERO {
            let drawdown = (peak - point.value) / peak * Decimal::ONE_HUNDRED;
            if drawdown > worst {
                worst = drawdown;
                worst_date = Some(point.date);
            }
        }
    }
    (worst, worst_date)
}

/// Winning trades as a percentage of all closed trades (0 when empty).
pub fn win_rate_pct(trades: &[ClosedTrade]) -> Decimal {
    if trades.is_empty() {
        return Decimal::ZERO;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    Decimal::from(winners * 100) / Decimal::from(trades.len())
}

/// Mean holding period over all closed trades, in trading days.
pub fn avg_holding_days(trades: &[ClosedTrade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    trades.iter().map(|t| f64::from(t.holding_days)).sum::<f64>() / trades.len() as f64
}

/// One calendar-month bucket of the equity curve.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MonthlyBucket {
    /// Month key, `YYYY-MM`
    pub month: String,
    /// Portfolio return for the month, relative to the prior bucket end
    pub return_pct: Decimal,
    /// Benchmark return for the same month, when available
    pub benchmark_return_pct: Option<Decimal>,
}

/// Group the equity curve by calendar month; each bucket's return is
/// computed against the prior bucket's closing value (the starting
/// amount for the first bucket).
pub fn monthly_breakdown(
    equity_curve: &[EquityCurvePoint],
    initial_value: Decimal,
) -> Vec<MonthlyBucket> {
    let mut buckets: Vec<MonthlyBucket> = Vec::new();
    let mut prev_value = initial_value;
    let mut prev_benchmark: Option<Decimal> = equity_curve.first().and_then(|p| p.benchmark);

    let mut idx = 0;
    while idx < equity_curve.len() {
        let month_of = |p: &EquityCurvePoint| (p.date.year(), p.date.month());
        let month = month_of(&equity_curve[idx]);
        let mut end = idx;
        while end + 1 < equity_curve.len() && month_of(&equity_curve[end + 1]) == month {
            end += 1;
        }
        let close = &equity_curve[end];

        let return_pct = if prev_value > Decimal::ZERO {
            (close.value - prev_value) / prev_value * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
        let benchmark_return_pct = match (close.benchmark, prev_benchmark) {
            (Some(current), Some(prev)) if prev > Decimal::ZERO => {
                Some((current - prev) / prev * Decimal::ONE_HUNDRED)
            }
            _ => None,
        };

        buckets.push(MonthlyBucket {
            month: format!("{:04}-{:02}", month.0, month.1),
            return_pct,
            benchmark_return_pct,
        });

        prev_value = close.value;
        prev_benchmark = close.benchmark.or(prev_benchmark);
        idx = end + 1;
    }
    buckets
}

/// Daily percentage returns of the equity curve.
fn daily_returns(equity_curve: &[EquityCurvePoint]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .filter_map(|pair| {
            let prev = pair[0].value.to_f64()?;
            let current = pair[1].value.to_f64()?;
            if prev > 0.0 {
                Some(current / prev - 1.0)
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use signalsim_core::ExitReason;

    fn point(date: &str, value: Decimal, benchmark: Option<Decimal>) -> EquityCurvePoint {
        EquityCurvePoint {
            date: date.parse().unwrap(),
            value,
            benchmark,
        }
    }

    fn trade(profit: Decimal, holding_days: u32) -> ClosedTrade {
        ClosedTrade {
            symbol: "COMI.CA".into(),
            buy_date: "2024-06-03".parse().unwrap(),
            buy_price: dec!(100),
            sell_date: "2024-06-10".parse().unwrap(),
            sell_price: dec!(100) + profit / dec!(10),
            shares: dec!(10),
            return_pct: profit / dec!(10),
            profit,
            holding_days,
            exit_reason: ExitReason::TimeExit,
        }
    }

    #[test]
    fn test_annualized_return() {
        // 10% over exactly one trading year stays 10%.
        let pct = annualized_return_pct(dec!(100_000), dec!(110_000), 252);
        assert!((pct - 10.0).abs() < 1e-9);
        // Degenerate inputs report zero.
        assert_eq!(annualized_return_pct(dec!(0), dec!(110_000), 252), 0.0);
        assert_eq!(annualized_return_pct(dec!(100_000), dec!(110_000), 0), 0.0);
    }

    #[test]
    fn test_sharpe_zero_for_flat_curve() {
        let curve: Vec<EquityCurvePoint> = (1..=5)
            .map(|d| point(&format!("2024-06-0{d}"), dec!(100_000), None))
            .collect();
        assert_eq!(sharpe_ratio(&curve), 0.0);
    }

    #[test]
    fn test_sharpe_zero_for_short_curve() {
        let curve = vec![point("2024-06-03", dec!(100_000), None)];
        assert_eq!(sharpe_ratio(&curve), 0.0);
    }

    #[test]
    fn test_sharpe_positive_for_rising_curve() {
        let curve = vec![
            point("2024-06-03", dec!(100_000), None),
            point("2024-06-04", dec!(101_000), None),
            point("2024-06-05", dec!(101_500), None),
            point("2024-06-06", dec!(103_000), None),
        ];
        assert!(sharpe_ratio(&curve) > 0.0);
    }

    #[test]
    fn test_max_drawdown_tracks_peak_and_date() {
        let curve = vec![
            point("2024-06-03", dec!(100_000), None),
            point("2024-06-04", dec!(110_000), None),
            point("2024-06-05", dec!(99_000), None),
            point("2024-06-06", dec!(105_000), None),
        ];
        let (dd, date) = max_drawdown(&curve);
        assert_eq!(dd, dec!(10));
        assert_eq!(date, Some("2024-06-05".parse::<NaiveDate>().unwrap()));
    }

    #[test]
    fn test_win_rate() {
        assert_eq!(win_rate_pct(&[]), Decimal::ZERO);
        let trades = vec![trade(dec!(100), 5), trade(dec!(-50), 3), trade(dec!(20), 8)];
        let rate = win_rate_pct(&trades);
        assert!((rate - dec!(66.666)).abs() < dec!(0.01));
    }

    #[test]
    fn test_avg_holding_days() {
        let trades = vec![trade(dec!(1), 4), trade(dec!(1), 8)];
        assert_eq!(avg_holding_days(&trades), 6.0);
    }

    #[test]
    fn test_monthly_breakdown_buckets() {
        let curve = vec![
            point("2024-06-27", dec!(100_000), Some(dec!(100_000))),
            point("2024-06-30", dec!(102_000), Some(dec!(101_000))),
            point("2024-07-15", dec!(101_000), Some(dec!(100_500))),
            point("2024-07-31", dec!(104_040), Some(dec!(103_020))),
        ];
        let buckets = monthly_breakdown(&curve, dec!(100_000));
        assert_eq!(buckets.len(), 2);

        assert_eq!(buckets[0].month, "2024-06");
        assert_eq!(buckets[0].return_pct, dec!(2));
        assert_eq!(buckets[0].benchmark_return_pct, Some(dec!(1)));

        assert_eq!(buckets[1].month, "2024-07");
        assert_eq!(buckets[1].return_pct, dec!(2));
        assert_eq!(buckets[1].benchmark_return_pct, Some(dec!(2)));
    }
}

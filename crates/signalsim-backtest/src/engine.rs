//! Day-by-day replay of past trade recommendations.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use signalsim_core::{
    ClosedTrade, EquityCurvePoint, ExitReason, Position, PriceSeries, RecommendationEvent,
    SimError, SimResult,
};

use crate::allocation::AllocationLadder;

/// Replay engine tuning knobs.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Trading days a position may be held before a forced time exit
    pub holding_period_days: u32,
    /// Maximum concurrent open positions
    pub max_positions: usize,
    /// Fraction of total value kept as a cash reserve floor
    pub cash_reserve: Decimal,
    /// Absolute cap on a single position as a fraction of total value
    pub max_position: Decimal,
    /// Confidence allocation ladder
    pub ladder: AllocationLadder,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            holding_period_days: 10,
            max_positions: 10,
            cash_reserve: dec!(0.10),
            max_position: dec!(0.25),
            ladder: AllocationLadder::default(),
        }
    }
}

/// Raw output of one replay run, before analytics.
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    /// First simulated trading day
    pub start_date: NaiveDate,
    /// Last simulated trading day
    pub end_date: NaiveDate,
    pub initial_value: Decimal,
    pub final_value: Decimal,
    pub trades: Vec<ClosedTrade>,
    pub equity_curve: Vec<EquityCurvePoint>,
}

/// Deterministic, strictly sequential replay state machine.
///
/// One iteration per trading day (the sorted union of all dates present
/// in the fetched price series), three ordered phases: exits, entries,
/// snapshot. Later-day decisions depend on prior-day holdings and cash,
/// so the loop must not be reordered.
pub struct ReplayEngine {
    config: ReplayConfig,
}

impl ReplayEngine {
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    /// Replay the recommendations against the price history.
    ///
    /// `prices` and `recommendations` are bulk-fetched by the caller;
    /// the engine performs no I/O. Returns a typed `no_data` error when
    /// either input is empty for the range.
    pub fn run(
        &self,
        amount: Decimal,
        start_date: NaiveDate,
        prices: &HashMap<String, PriceSeries>,
        recommendations: &[RecommendationEvent],
        benchmark: Option<&PriceSeries>,
    ) -> SimResult<ReplayOutcome> {
        let trading_days: BTreeSet<NaiveDate> = prices
            .values()
            .flat_map(|s| s.points.iter().map(|p| p.date))
            .filter(|d| *d >= start_date)
            .collect();

        if trading_days.is_empty() {
            return Err(SimError::NoData(format!(
                "no price data on or after {start_date}"
            )));
        }

        let last_day = *trading_days.iter().next_back().expect("non-empty");
        let mut by_date: HashMap<NaiveDate, Vec<&RecommendationEvent>> = HashMap::new();
        let mut rec_count = 0usize;
        for rec in recommendations {
            if rec.date >= start_date && rec.date <= last_day {
                by_date.entry(rec.date).or_default().push(rec);
                rec_count += 1;
            }
        }
        if rec_count == 0 {
            return Err(SimError::NoData(format!(
                "no recommendations between {start_date} and {last_day}"
            )));
        }

        debug!(
            days = trading_days.len(),
            recommendations = rec_count,
            "starting replay"
        );

        let first_day = *trading_days.iter().next().expect("non-empty");
        let bench_anchor = benchmark.and_then(|b| b.close_on_or_before(first_day));

        let mut cash = amount;
        let mut holdings: HashMap<String, Position> = HashMap::new();
        let mut marks: HashMap<String, Decimal> = HashMap::new();
        let mut trades: Vec<ClosedTrade> = Vec::new();
        let mut equity_curve: Vec<EquityCurvePoint> = Vec::with_capacity(trading_days.len());

        for &day in &trading_days {
            // Refresh marks with today's closes; symbols that did not
            // trade, or whose close is not a representable positive
            // price, keep the prior day's mark.
            for (symbol, series) in prices {
                if let Some(close) = series.close_on(day) {
                    if let Ok(mark) = Decimal::try_from(close) {
                        if mark > Decimal::ZERO {
                            marks.insert(symbol.clone(), mark);
                        }
                    }
                }
            }

            // Phase 1: evaluate exits.
            let mut held: Vec<String> = holdings.keys().cloned().collect();
            held.sort();
            for symbol in held {
                let position = holdings.get_mut(&symbol).expect("held symbol");
                position.days_held += 1;

                let mark = marks.get(&symbol).copied().unwrap_or(position.buy_price);
                if let Some(reason) = self.exit_reason(position, mark) {
                    let position = holdings.remove(&symbol).expect("held symbol");
                    cash += position.value_at(mark);
                    trades.push(position.close(day, mark, reason));
                }
            }

            // Phase 2: evaluate entries.
            let total_value = cash + Self::holdings_value(&holdings, &marks);
            let reserve_floor = total_value * self.config.cash_reserve;
            let mut todays: Vec<&RecommendationEvent> = by_date
                .get(&day)
                .map(|events| {
                    events
                        .iter()
                        .filter(|e| e.action.is_entry())
                        .copied()
                        .collect()
                })
                .unwrap_or_default();
            todays.sort_by(|a, b| {
                b.confidence
                    .cmp(&a.confidence)
                    .then_with(|| a.symbol.cmp(&b.symbol))
            });

            for event in todays {
                if holdings.len() >= self.config.max_positions {
                    break;
                }
                if holdings.contains_key(&event.symbol) {
                    continue;
                }
                let available = cash - reserve_floor;
                if available <= Decimal::ZERO {
                    break;
                }

                let entry_price = Self::entry_price(event, &marks);
                let Some(entry_price) = entry_price else {
                    continue;
                };

                let tier = self
                    .config
                    .ladder
                    .allocation_for(event.normalized_confidence())
                    .min(self.config.max_position);
                let allocated = (total_value * tier).min(available);
                let shares = (allocated / entry_price).floor();
                if shares <= Decimal::ZERO {
                    continue;
                }

                cash -= shares * entry_price;
                holdings.insert(
                    event.symbol.clone(),
                    Position {
                        symbol: event.symbol.clone(),
                        shares,
                        buy_price: entry_price,
                        buy_date: day,
                        days_held: 0,
                        source: event.clone(),
                    },
                );
            }

            // Phase 3: snapshot.
            let value = cash + Self::holdings_value(&holdings, &marks);
            let bench_value = match (benchmark, bench_anchor) {
                (Some(series), Some(anchor)) if anchor > 0.0 => series
                    .close_on_or_before(day)
                    .map(|c| Self::scale_to_amount(amount, c / anchor)),
                _ => None,
            };
            equity_curve.push(EquityCurvePoint {
                date: day,
                value,
                benchmark: bench_value,
            });
        }

        // Force-close everything still held at the last available price.
        let mut remaining: Vec<String> = holdings.keys().cloned().collect();
        remaining.sort();
        for symbol in remaining {
            let position = holdings.remove(&symbol).expect("held symbol");
            let mark = marks.get(&symbol).copied().unwrap_or(position.buy_price);
            cash += position.value_at(mark);
            trades.push(position.close(last_day, mark, ExitReason::StillOpen));
        }

        debug!(trades = trades.len(), final_value = %cash, "replay complete");

        Ok(ReplayOutcome {
            start_date: first_day,
            end_date: last_day,
            initial_value: amount,
            final_value: cash,
            trades,
            equity_curve,
        })
    }

    /// Exit decision for one held position, in priority order.
    ///
    /// A known recommendation outcome wins over a same-day price breach;
    /// this mirrors the platform's historical behavior and is preserved
    /// as a given rule.
    fn exit_reason(&self, position: &Position, mark: Decimal) -> Option<ExitReason> {
        if let Some(correct) = position.source.was_correct {
            return Some(if correct {
                ExitReason::TargetHit
            } else {
                ExitReason::StopLoss
            });
        }
        let mark = mark.to_f64().unwrap_or(0.0);
        if position.source.stop_loss.is_some_and(|stop| mark <= stop) {
            return Some(ExitReason::StopLoss);
        }
        if position
            .source
            .target_price
            .is_some_and(|target| mark >= target)
        {
            return Some(ExitReason::TargetHit);
        }
        if position.days_held >= self.config.holding_period_days {
            return Some(ExitReason::TimeExit);
        }
        None
    }

    fn entry_price(
        event: &RecommendationEvent,
        marks: &HashMap<String, Decimal>,
    ) -> Option<Decimal> {
        if event.entry_price > 0.0 {
            return Decimal::try_from(event.entry_price).ok();
        }
        marks
            .get(&event.symbol)
            .copied()
            .filter(|p| *p > Decimal::ZERO)
    }

    fn holdings_value(holdings: &HashMap<String, Position>, marks: &HashMap<String, Decimal>) -> Decimal {
        holdings
            .values()
            .map(|p| p.value_at(marks.get(&p.symbol).copied().unwrap_or(p.buy_price)))
            .sum()
    }

    fn scale_to_amount(amount: Decimal, ratio: f64) -> Decimal {
        let amount = amount.to_f64().unwrap_or(0.0);
        Decimal::try_from(amount * ratio).unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signalsim_core::{Action, PricePoint};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    /// Ten consecutive weekday closes starting 2024-06-03.
    fn dates() -> Vec<NaiveDate> {
        [
            "2024-06-03",
            "2024-06-04",
            "2024-06-05",
            "2024-06-06",
            "2024-06-09",
            "2024-06-10",
            "2024-06-11",
            "2024-06-12",
            "2024-06-13",
            "2024-06-16",
        ]
        .iter()
        .map(|s| date(s))
        .collect()
    }

    fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
        let points = dates()
            .into_iter()
            .zip(closes.iter())
            .map(|(d, &c)| PricePoint::new(d, c))
            .collect();
        PriceSeries::from_points(symbol, points)
    }

    fn buy_event(symbol: &str, entry: f64, target: Option<f64>, stop: Option<f64>) -> RecommendationEvent {
        RecommendationEvent {
            symbol: symbol.into(),
            date: date("2024-06-03"),
            action: Action::Buy,
            confidence: 80,
            entry_price: entry,
            stop_loss: stop,
            target_price: target,
            was_correct: None,
            next_day_return: None,
        }
    }

    fn engine() -> ReplayEngine {
        ReplayEngine::new(ReplayConfig::default())
    }

    #[test]
    fn test_no_recommendations_is_typed_no_data() {
        let mut prices = HashMap::new();
        prices.insert("COMI.CA".to_string(), series("COMI.CA", &[70.0; 10]));

        let err = engine()
            .run(dec!(50_000), date("2024-06-03"), &prices, &[], None)
            .unwrap_err();
        assert!(matches!(err, SimError::NoData(_)));
    }

    #[test]
    fn test_no_prices_is_typed_no_data() {
        let prices = HashMap::new();
        let recs = vec![buy_event("COMI.CA", 70.0, None, None)];
        let err = engine()
            .run(dec!(50_000), date("2024-06-03"), &prices, &recs, None)
            .unwrap_err();
        assert!(matches!(err, SimError::NoData(_)));
    }

    #[test]
    fn test_target_hit_returns_ten_percent() {
        // Price reaches the 10% target on day 4, well before time exit.
        let mut prices = HashMap::new();
        prices.insert(
            "COMI.CA".to_string(),
            series(
                "COMI.CA",
                &[100.0, 102.0, 105.0, 110.0, 111.0, 111.0, 111.0, 111.0, 111.0, 111.0],
            ),
        );
        let recs = vec![buy_event("COMI.CA", 100.0, Some(110.0), None)];

        let outcome = engine()
            .run(dec!(100_000), date("2024-06-03"), &prices, &recs, None)
            .unwrap();

        assert_eq!(outcome.trades.len(), 1);
        let trade = &outcome.trades[0];
        assert_eq!(trade.exit_reason, ExitReason::TargetHit);
        assert_eq!(trade.return_pct, dec!(10));
        assert_eq!(trade.sell_date, date("2024-06-06"));
    }

    #[test]
    fn test_stop_loss_exit() {
        let mut prices = HashMap::new();
        prices.insert(
            "HRHO.CA".to_string(),
            series(
                "HRHO.CA",
                &[20.0, 19.5, 18.9, 18.5, 18.4, 18.4, 18.4, 18.4, 18.4, 18.4],
            ),
        );
        let recs = vec![buy_event("HRHO.CA", 20.0, Some(25.0), Some(19.0))];

        let outcome = engine()
            .run(dec!(100_000), date("2024-06-03"), &prices, &recs, None)
            .unwrap();

        let trade = &outcome.trades[0];
        assert_eq!(trade.exit_reason, ExitReason::StopLoss);
        assert!(trade.profit < Decimal::ZERO);
    }

    #[test]
    fn test_known_outcome_beats_price_breach() {
        // The price breaches the target, but the recommendation outcome
        // is already known to be wrong: the known-outcome path wins.
        let mut prices = HashMap::new();
        prices.insert(
            "EAST.CA".to_string(),
            series(
                "EAST.CA",
                &[10.0, 12.0, 12.0, 12.0, 12.0, 12.0, 12.0, 12.0, 12.0, 12.0],
            ),
        );
        let mut event = buy_event("EAST.CA", 10.0, Some(11.0), None);
        event.was_correct = Some(false);
        let recs = vec![event];

        let outcome = engine()
            .run(dec!(100_000), date("2024-06-03"), &prices, &recs, None)
            .unwrap();

        assert_eq!(outcome.trades[0].exit_reason, ExitReason::StopLoss);
    }

    #[test]
    fn test_time_exit_after_holding_period() {
        let mut points = Vec::new();
        let mut d = date("2024-06-03");
        for _ in 0..15 {
            points.push(PricePoint::new(d, 50.0));
            d = d.succ_opt().unwrap();
        }
        let mut prices = HashMap::new();
        prices.insert(
            "ETEL.CA".to_string(),
            PriceSeries::from_points("ETEL.CA", points),
        );
        let recs = vec![buy_event("ETEL.CA", 50.0, None, None)];

        let outcome = engine()
            .run(dec!(100_000), date("2024-06-03"), &prices, &recs, None)
            .unwrap();

        let trade = &outcome.trades[0];
        assert_eq!(trade.exit_reason, ExitReason::TimeExit);
        assert_eq!(trade.holding_days, 10);
    }

    #[test]
    fn test_still_open_force_close() {
        let mut prices = HashMap::new();
        prices.insert(
            "SWDY.CA".to_string(),
            series(
                "SWDY.CA",
                &[40.0, 40.5, 41.0, 41.5, 42.0, 42.5, 43.0, 43.5, 44.0, 44.5],
            ),
        );
        // Recommend on the second-to-last day so the holding period
        // cannot elapse before the range ends.
        let mut event = buy_event("SWDY.CA", 44.0, None, None);
        event.date = date("2024-06-13");
        let recs = vec![event];

        let outcome = engine()
            .run(dec!(100_000), date("2024-06-03"), &prices, &recs, None)
            .unwrap();

        let trade = &outcome.trades[0];
        assert_eq!(trade.exit_reason, ExitReason::StillOpen);
        assert_eq!(trade.sell_date, date("2024-06-16"));
        assert_eq!(trade.sell_price, dec!(44.5));
    }

    #[test]
    fn test_unrepresentable_close_keeps_prior_mark() {
        // A close too large for Decimal must not collapse to a zero
        // mark and fake a stop-loss breach; the prior mark stands.
        let mut prices = HashMap::new();
        prices.insert(
            "ABUK.CA".to_string(),
            series(
                "ABUK.CA",
                &[20.0, 1e30, 20.0, 20.0, 20.0, 20.0, 20.0, 20.0, 20.0, 20.0],
            ),
        );
        let recs = vec![buy_event("ABUK.CA", 20.0, None, Some(19.0))];

        let amount = dec!(100_000);
        let outcome = engine()
            .run(amount, date("2024-06-03"), &prices, &recs, None)
            .unwrap();

        let trade = &outcome.trades[0];
        assert_ne!(trade.exit_reason, ExitReason::StopLoss);
        assert_eq!(trade.sell_price, dec!(20));
        assert_eq!(outcome.final_value, amount);
    }

    #[test]
    fn test_conservation_of_value() {
        // cash + mark-to-market always equals the recorded equity value,
        // and the final curve point matches the force-closed final value.
        let mut prices = HashMap::new();
        prices.insert(
            "COMI.CA".to_string(),
            series(
                "COMI.CA",
                &[100.0, 101.0, 99.0, 103.0, 104.0, 102.0, 105.0, 106.0, 104.0, 107.0],
            ),
        );
        let recs = vec![buy_event("COMI.CA", 100.0, None, None)];

        let amount = dec!(100_000);
        let outcome = engine()
            .run(amount, date("2024-06-03"), &prices, &recs, None)
            .unwrap();

        assert_eq!(outcome.equity_curve.len(), 10);
        let last = outcome.equity_curve.last().unwrap();
        assert_eq!(last.value, outcome.final_value);

        // Curve dates strictly increasing over the union of price dates.
        for pair in outcome.equity_curve.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }

        // No cash was created or destroyed: final value equals initial
        // plus the sum of trade profits.
        let total_profit: Decimal = outcome.trades.iter().map(|t| t.profit).sum();
        assert_eq!(outcome.final_value, amount + total_profit);
    }

    #[test]
    fn test_entries_respect_position_and_reserve_limits() {
        let mut config = ReplayConfig::default();
        config.max_positions = 2;
        let engine = ReplayEngine::new(config);

        let mut prices = HashMap::new();
        for symbol in ["A.CA", "B.CA", "C.CA"] {
            prices.insert(symbol.to_string(), series(symbol, &[10.0; 10]));
        }
        let recs: Vec<RecommendationEvent> = ["A.CA", "B.CA", "C.CA"]
            .iter()
            .map(|s| buy_event(s, 10.0, None, None))
            .collect();

        let outcome = engine
            .run(dec!(100_000), date("2024-06-03"), &prices, &recs, None)
            .unwrap();

        // Only two of the three candidates could be opened on day one.
        let opened: Vec<&ClosedTrade> = outcome
            .trades
            .iter()
            .filter(|t| t.buy_date == date("2024-06-03"))
            .collect();
        assert_eq!(opened.len(), 2);
    }

    #[test]
    fn test_higher_confidence_enters_first() {
        let mut config = ReplayConfig::default();
        config.max_positions = 1;
        let engine = ReplayEngine::new(config);

        let mut prices = HashMap::new();
        for symbol in ["LOW.CA", "HIGH.CA"] {
            prices.insert(symbol.to_string(), series(symbol, &[10.0; 10]));
        }
        let mut low = buy_event("LOW.CA", 10.0, None, None);
        low.confidence = 55;
        let mut high = buy_event("HIGH.CA", 10.0, None, None);
        high.confidence = 90;

        let outcome = engine
            .run(dec!(100_000), date("2024-06-03"), &prices, &[low, high], None)
            .unwrap();

        assert_eq!(outcome.trades.len(), 1);
        assert_eq!(outcome.trades[0].symbol, "HIGH.CA");
    }

    #[test]
    fn test_benchmark_scaled_to_amount() {
        let mut prices = HashMap::new();
        prices.insert(
            "COMI.CA".to_string(),
            series("COMI.CA", &[100.0; 10]),
        );
        let bench = series(
            "EGX30",
            &[
                20_000.0, 20_200.0, 20_400.0, 20_600.0, 20_800.0, 21_000.0, 21_200.0, 21_400.0,
                21_600.0, 22_000.0,
            ],
        );
        let recs = vec![buy_event("COMI.CA", 100.0, None, None)];

        let outcome = engine()
            .run(dec!(100_000), date("2024-06-03"), &prices, &recs, Some(&bench))
            .unwrap();

        let first = outcome.equity_curve.first().unwrap();
        let last = outcome.equity_curve.last().unwrap();
        assert_eq!(first.benchmark.unwrap(), dec!(100_000));
        assert_eq!(last.benchmark.unwrap(), dec!(110_000));
    }
}

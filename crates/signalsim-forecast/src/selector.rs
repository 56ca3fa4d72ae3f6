//! Universe-wide candidate ranking for "auto" forecasts.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{debug, warn};

use signalsim_core::{PriceRepository, PriceSeries, Scenario, SimError, SimResult};

use crate::distribution::DistributionSummary;
use crate::gbm::{GbmParams, MIN_OBSERVATIONS};
use crate::monte_carlo::simulate_terminal_values;
use crate::result::CandidateScore;
use crate::universe::CANDIDATE_UNIVERSE;

/// A fully evaluated candidate, kept so the winner's forecast does not
/// have to be re-simulated.
#[derive(Debug, Clone)]
pub struct CandidateEvaluation {
    pub params: GbmParams,
    pub summary: DistributionSummary,
    pub score: f64,
}

/// Outcome of one selection pass.
#[derive(Debug, Clone)]
pub struct Selection {
    pub winner: CandidateEvaluation,
    /// Top candidates by score, winner first
    pub ranking: Vec<CandidateScore>,
}

/// Ranks a fixed candidate universe by simulated outcome quality.
///
/// Prices come from one batch fetch; symbols the batch misses (or
/// returns too thin) are retried one by one against an optional
/// fallback repository. A candidate that still fails estimation is
/// dropped from the ranking, never escalated.
pub struct AutoSelector {
    prices: Arc<dyn PriceRepository>,
    fallback: Option<Arc<dyn PriceRepository>>,
    universe: Vec<String>,
    ranking_size: usize,
}

impl AutoSelector {
    pub fn new(prices: Arc<dyn PriceRepository>) -> Self {
        Self {
            prices,
            fallback: None,
            universe: CANDIDATE_UNIVERSE.iter().map(|s| s.to_string()).collect(),
            ranking_size: 5,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn PriceRepository>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Replace the candidate universe (used by tests).
    pub fn with_universe(mut self, symbols: Vec<String>) -> Self {
        self.universe = symbols;
        self
    }

    /// Evaluate the whole universe and pick the best-scoring candidate.
    ///
    /// Errors only when no candidate has enough usable history.
    pub async fn select(
        &self,
        amount: f64,
        horizon_days: u32,
        scenario: Scenario,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SimResult<Selection> {
        let mut series_map = self
            .prices
            .fetch_prices_batch(&self.universe, start, end)
            .await?;
        self.backfill_thin_candidates(&mut series_map, start, end).await;

        let candidates: Vec<PriceSeries> = self
            .universe
            .iter()
            .filter_map(|symbol| series_map.remove(symbol))
            .collect();

        // Candidates are independent; evaluate in parallel and drop
        // the ones that fail estimation.
        let mut evaluations: Vec<CandidateEvaluation> = candidates
            .into_par_iter()
            .filter_map(|series| {
                match evaluate_candidate(&series, amount, horizon_days, scenario) {
                    Ok(eval) => Some(eval),
                    Err(err) => {
                        debug!(symbol = %series.symbol, %err, "candidate excluded");
                        None
                    }
                }
            })
            .collect();

        if evaluations.is_empty() {
            warn!("no candidate in the universe has enough usable history");
            return Err(SimError::NoData(
                "no candidate in the universe has enough usable history".into(),
            ));
        }

        evaluations.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.params.symbol.cmp(&b.params.symbol))
        });

        let ranking = evaluations
            .iter()
            .take(self.ranking_size)
            .map(|e| CandidateScore {
                symbol: e.params.symbol.clone(),
                score: e.score,
                probability_positive: e.summary.probability_positive,
                expected_return_pct: e.summary.returns_pct.mean,
                volatility_annual_pct: e.params.sigma * 100.0,
            })
            .collect();

        let winner = evaluations.swap_remove(0);
        debug!(symbol = %winner.params.symbol, score = winner.score, "candidate selected");
        Ok(Selection { winner, ranking })
    }

    /// Retry missing or under-populated symbols against the fallback
    /// repository, one at a time. Fallback errors are swallowed.
    async fn backfill_thin_candidates(
        &self,
        series_map: &mut HashMap<String, PriceSeries>,
        start: NaiveDate,
        end: NaiveDate,
    ) {
        let Some(fallback) = &self.fallback else {
            return;
        };
        for symbol in &self.universe {
            let thin = series_map
                .get(symbol)
                .map(|s| s.len() < MIN_OBSERVATIONS)
                .unwrap_or(true);
            if !thin {
                continue;
            }
            match fallback.fetch_prices(symbol, start, end).await {
                Ok(series) if series.len() >= MIN_OBSERVATIONS => {
                    series_map.insert(symbol.clone(), series);
                }
                Ok(_) => {}
                Err(err) => {
                    debug!(%symbol, %err, "fallback fetch failed");
                }
            }
        }
    }
}

/// Score one candidate: estimate, simulate, summarize.
///
/// score = P(gain) × (1 + max(expected_return_pct, 0) / 100), so a high
/// expected return only helps when the odds of any gain back it up.
fn evaluate_candidate(
    series: &PriceSeries,
    amount: f64,
    horizon_days: u32,
    scenario: Scenario,
) -> SimResult<CandidateEvaluation> {
    let params = GbmParams::estimate(series)?;
    let values = simulate_terminal_values(&params, amount, horizon_days, scenario);
    let summary = DistributionSummary::from_samples(&values, amount);
    let score = summary.probability_positive
        * (1.0 + summary.returns_pct.mean.max(0.0) / 100.0);
    Ok(CandidateEvaluation {
        params,
        summary,
        score,
    })
}

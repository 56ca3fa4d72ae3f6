//! Request-to-result orchestration for backtests.

use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use signalsim_core::{
    BacktestRequest, InstrumentRepository, PriceRepository, PriceSeries,
    RecommendationRepository, SimError, SimResult,
};

use crate::engine::{ReplayConfig, ReplayEngine};
use crate::result::SimulationResult;

/// Wires the repositories to the pure replay engine.
///
/// All I/O happens up front: recommendations and instrument names are
/// fetched concurrently, then one batch price call covers every
/// recommended symbol plus the benchmark. The engine itself never
/// touches a repository.
pub struct BacktestService {
    prices: Arc<dyn PriceRepository>,
    recommendations: Arc<dyn RecommendationRepository>,
    instruments: Arc<dyn InstrumentRepository>,
    benchmark_symbol: String,
    engine: ReplayEngine,
}

impl BacktestService {
    pub fn new(
        prices: Arc<dyn PriceRepository>,
        recommendations: Arc<dyn RecommendationRepository>,
        instruments: Arc<dyn InstrumentRepository>,
        benchmark_symbol: impl Into<String>,
    ) -> Self {
        Self {
            prices,
            recommendations,
            instruments,
            benchmark_symbol: benchmark_symbol.into(),
            engine: ReplayEngine::new(ReplayConfig::default()),
        }
    }

    /// Override the default replay configuration.
    pub fn with_config(mut self, config: ReplayConfig) -> Self {
        self.engine = ReplayEngine::new(config);
        self
    }

    /// Validate, fetch, replay, analyze.
    pub async fn run(&self, request: &BacktestRequest) -> SimResult<SimulationResult> {
        self.run_as_of(request, Utc::now().date_naive()).await
    }

    /// Like [`run`](Self::run), with an injected "today" for tests.
    pub async fn run_as_of(
        &self,
        request: &BacktestRequest,
        today: NaiveDate,
    ) -> SimResult<SimulationResult> {
        request.validate(today)?;

        let (recommendations, names) = tokio::join!(
            self.recommendations
                .fetch_recommendations(request.start_date, today),
            self.instruments.fetch_instrument_names(),
        );
        let recommendations = recommendations?;
        let names = names.unwrap_or_default();

        if recommendations.is_empty() {
            return Err(SimError::NoData(format!(
                "no recommendations between {} and {today}",
                request.start_date
            )));
        }

        let mut symbols: Vec<String> = recommendations
            .iter()
            .map(|r| r.symbol.clone())
            .collect();
        symbols.sort();
        symbols.dedup();
        symbols.push(self.benchmark_symbol.clone());

        info!(
            recommendations = recommendations.len(),
            symbols = symbols.len(),
            start = %request.start_date,
            "fetching price history for replay"
        );

        let mut prices: HashMap<String, PriceSeries> = self
            .prices
            .fetch_prices_batch(&symbols, request.start_date, today)
            .await?;
        let benchmark = prices.remove(&self.benchmark_symbol).filter(|s| !s.is_empty());

        let outcome = self.engine.run(
            request.amount,
            request.start_date,
            &prices,
            &recommendations,
            benchmark.as_ref(),
        )?;

        Ok(SimulationResult::from_replay(outcome, &names))
    }
}

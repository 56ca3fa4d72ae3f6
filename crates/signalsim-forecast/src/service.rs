//! Request-to-result orchestration for forecasts.

use chrono::{Days, NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use signalsim_core::{
    ForecastRequest, InstrumentRepository, PriceRepository, SimError, SimResult, SymbolChoice,
};

use crate::distribution::{band_points, DistributionSummary};
use crate::gbm::GbmParams;
use crate::monte_carlo::simulate_terminal_values;
use crate::result::ForecastResult;
use crate::selector::AutoSelector;

/// Calendar days fetched for estimation; generously covers the
/// five-year trading-day lookback cap.
const FETCH_WINDOW_DAYS: u64 = 5 * 365 + 30;

/// Wires the repositories to the pure forecast pipeline.
///
/// One price fetch per request (a universe batch on the auto path),
/// then estimation, simulation, and summarization run without I/O.
pub struct ForecastService {
    prices: Arc<dyn PriceRepository>,
    instruments: Arc<dyn InstrumentRepository>,
    selector: AutoSelector,
}

impl ForecastService {
    pub fn new(
        prices: Arc<dyn PriceRepository>,
        instruments: Arc<dyn InstrumentRepository>,
    ) -> Self {
        let selector = AutoSelector::new(Arc::clone(&prices));
        Self {
            prices,
            instruments,
            selector,
        }
    }

    /// Override the auto-selection strategy (fallback repo, universe).
    pub fn with_selector(mut self, selector: AutoSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Validate, fetch, estimate, simulate, summarize.
    pub async fn run(&self, request: &ForecastRequest) -> SimResult<ForecastResult> {
        self.run_as_of(request, Utc::now().date_naive()).await
    }

    /// Like [`run`](Self::run), with an injected "today" for tests.
    pub async fn run_as_of(
        &self,
        request: &ForecastRequest,
        today: NaiveDate,
    ) -> SimResult<ForecastResult> {
        request.validate()?;
        let start = today - Days::new(FETCH_WINDOW_DAYS);

        match &request.symbol {
            SymbolChoice::Symbol(symbol) => self.run_symbol(request, symbol, start, today).await,
            SymbolChoice::Auto => self.run_auto(request, start, today).await,
        }
    }

    async fn run_symbol(
        &self,
        request: &ForecastRequest,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SimResult<ForecastResult> {
        let series = self.prices.fetch_prices(symbol, start, end).await?;
        if series.is_empty() {
            return Err(SimError::NoData(format!(
                "no price data for {symbol} between {start} and {end}"
            )));
        }

        let params = GbmParams::estimate(&series)?;
        info!(
            %symbol,
            mu = params.mu,
            sigma = params.sigma,
            data_points = params.data_points,
            "running forecast"
        );

        let values =
            simulate_terminal_values(&params, request.amount, request.horizon_days, request.scenario);
        let summary = DistributionSummary::from_samples(&values, request.amount);
        let band = band_points(&params, request.amount, request.horizon_days, request.scenario);

        let names = self
            .instruments
            .fetch_instrument_names()
            .await
            .unwrap_or_default();

        Ok(ForecastResult::from_parts(
            &params,
            request.amount,
            request.horizon_days,
            request.scenario,
            &summary,
            band,
            names.get(symbol),
        ))
    }

    async fn run_auto(
        &self,
        request: &ForecastRequest,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SimResult<ForecastResult> {
        let selection = self
            .selector
            .select(
                request.amount,
                request.horizon_days,
                request.scenario,
                start,
                end,
            )
            .await?;

        let winner = selection.winner;
        info!(symbol = %winner.params.symbol, score = winner.score, "auto-selected forecast");

        let band = band_points(
            &winner.params,
            request.amount,
            request.horizon_days,
            request.scenario,
        );
        let names = self
            .instruments
            .fetch_instrument_names()
            .await
            .unwrap_or_default();

        Ok(ForecastResult::from_parts(
            &winner.params,
            request.amount,
            request.horizon_days,
            request.scenario,
            &winner.summary,
            band,
            names.get(&winner.params.symbol),
        )
        .with_auto_ranking(selection.ranking))
    }
}

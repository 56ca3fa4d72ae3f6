//! Forecast result shape and rendering.

use serde::{Deserialize, Serialize};

use signalsim_core::{InstrumentName, Scenario};

use crate::distribution::{BandPoint, DistributionSummary, Histogram};
use crate::gbm::GbmParams;

/// One auto-selector ranking entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateScore {
    pub symbol: String,
    /// Composite score the ranking sorts on
    pub score: f64,
    pub probability_positive: f64,
    pub expected_return_pct: f64,
    pub volatility_annual_pct: f64,
}

/// Aggregate output of one forecast run.
///
/// Monetary and percentage figures are rounded to 2 decimal places
/// here, at the presentation boundary; the band and histogram keep
/// full precision for plotting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub investment_amount: f64,
    pub last_price: f64,
    pub horizon_days: u32,
    pub scenario: Scenario,
    /// Estimated drift before any scenario adjustment
    pub drift_annual_pct: f64,
    /// Drift actually fed to the simulation
    pub drift_used_pct: f64,
    pub volatility_annual_pct: f64,
    pub data_points: usize,
    pub expected_value: f64,
    pub expected_return_pct: f64,
    pub median_value: f64,
    /// 5th percentile of terminal value
    pub worst_case_value: f64,
    /// 95th percentile of terminal value
    pub best_case_value: f64,
    pub quartile_25: f64,
    pub quartile_75: f64,
    /// Probability of ending above the invested amount, in percent
    pub probability_positive: f64,
    pub histogram: Histogram,
    pub band_data: Vec<BandPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_selected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_ranking: Option<Vec<CandidateScore>>,
}

impl ForecastResult {
    /// Assemble the result from the model, its sample summary, and the
    /// analytic band.
    pub fn from_parts(
        params: &GbmParams,
        amount: f64,
        horizon_days: u32,
        scenario: Scenario,
        summary: &DistributionSummary,
        band_data: Vec<BandPoint>,
        name: Option<&InstrumentName>,
    ) -> Self {
        Self {
            symbol: params.symbol.clone(),
            name: name.map(|n| n.name_primary.clone()),
            investment_amount: amount,
            last_price: params.last_price,
            horizon_days,
            scenario,
            drift_annual_pct: round2(params.mu * 100.0),
            drift_used_pct: round2((params.mu + scenario.drift_adjustment()) * 100.0),
            volatility_annual_pct: round2(params.sigma * 100.0),
            data_points: params.data_points,
            expected_value: round2(summary.values.mean),
            expected_return_pct: round2(summary.returns_pct.mean),
            median_value: round2(summary.values.median),
            worst_case_value: round2(summary.values.p5),
            best_case_value: round2(summary.values.p95),
            quartile_25: round2(summary.values.p25),
            quartile_75: round2(summary.values.p75),
            probability_positive: round2(summary.probability_positive * 100.0),
            histogram: summary.histogram.clone(),
            band_data,
            auto_selected: None,
            auto_ranking: None,
        }
    }

    /// Mark the result as produced by the auto-selector path.
    pub fn with_auto_ranking(mut self, ranking: Vec<CandidateScore>) -> Self {
        self.auto_selected = Some(true);
        self.auto_ranking = Some(ranking);
        self
    }

    /// Human-readable summary for the CLI.
    pub fn summary(&self) -> String {
        let mut s = String::new();
        s.push_str("═══════════════════════════════════════════════\n");
        s.push_str("              FORECAST RESULT                   \n");
        s.push_str("═══════════════════════════════════════════════\n");
        match &self.name {
            Some(name) => s.push_str(&format!("  Symbol:             {} ({})\n", self.symbol, name)),
            None => s.push_str(&format!("  Symbol:             {}\n", self.symbol)),
        }
        s.push_str(&format!("  Scenario:           {}\n", self.scenario));
        s.push_str(&format!("  Horizon:            {} trading days\n", self.horizon_days));
        s.push_str(&format!("  Investment:         {:.2}\n", self.investment_amount));
        s.push_str(&format!("  Last Price:         {:.2}\n", self.last_price));
        s.push_str(&format!(
            "  Drift / Vol:        {:.2}% / {:.2}% annualized\n",
            self.drift_used_pct, self.volatility_annual_pct
        ));
        s.push_str(&format!("  Expected Value:     {:.2} ({:+.2}%)\n", self.expected_value, self.expected_return_pct));
        s.push_str(&format!("  Median Value:       {:.2}\n", self.median_value));
        s.push_str(&format!(
            "  5%..95% Range:      {:.2} .. {:.2}\n",
            self.worst_case_value, self.best_case_value
        ));
        s.push_str(&format!("  P(gain):            {:.2}%\n", self.probability_positive));
        if let Some(ranking) = &self.auto_ranking {
            s.push_str("  Auto-Selected Ranking:\n");
            for (i, c) in ranking.iter().enumerate() {
                s.push_str(&format!(
                    "    {}. {:<10} score {:.4}  P(gain) {:.1}%  E[r] {:+.2}%\n",
                    i + 1,
                    c.symbol,
                    c.score,
                    c.probability_positive * 100.0,
                    c.expected_return_pct
                ));
            }
        }
        s.push_str("═══════════════════════════════════════════════\n");
        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

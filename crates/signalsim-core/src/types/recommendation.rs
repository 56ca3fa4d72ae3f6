//! Trade recommendation events.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Recommended action attached to a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Buy,
    StrongBuy,
    Sell,
    Hold,
    Watch,
}

impl Action {
    /// Whether the replay engine may open a position on this action.
    pub fn is_entry(&self) -> bool {
        matches!(self, Action::Buy | Action::StrongBuy)
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(Action::Buy),
            "STRONG_BUY" => Ok(Action::StrongBuy),
            "SELL" => Ok(Action::Sell),
            "HOLD" => Ok(Action::Hold),
            "WATCH" => Ok(Action::Watch),
            other => Err(format!("unknown action: {other}")),
        }
    }
}

/// A dated trade recommendation as produced by the signal platform.
///
/// Immutable once observed by the engines. The optional outcome fields
/// are populated by the platform after the fact and drive the replay
/// engine's highest-priority exit rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationEvent {
    /// Instrument symbol
    pub symbol: String,
    /// Date the recommendation was issued
    pub date: NaiveDate,
    /// Recommended action
    pub action: Action,
    /// Confidence, 0-100
    pub confidence: u8,
    /// Suggested entry price
    pub entry_price: f64,
    /// Optional stop-loss price
    pub stop_loss: Option<f64>,
    /// Optional target price
    pub target_price: Option<f64>,
    /// Realized outcome, once known
    pub was_correct: Option<bool>,
    /// Next-day return observed after issuance
    pub next_day_return: Option<f64>,
}

impl RecommendationEvent {
    /// Confidence normalized to [0, 1].
    pub fn normalized_confidence(&self) -> f64 {
        f64::from(self.confidence.min(100)) / 100.0
    }
}

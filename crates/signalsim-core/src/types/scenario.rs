//! Forecast scenarios.

use serde::{Deserialize, Serialize};

/// Fixed additive drift adjustment applied to a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    #[default]
    Base,
    Bull,
    Bear,
}

impl Scenario {
    /// Annualized drift adjustment for this scenario.
    pub fn drift_adjustment(&self) -> f64 {
        match self {
            Scenario::Base => 0.0,
            Scenario::Bull => 0.02,
            Scenario::Bear => -0.02,
        }
    }
}

impl std::str::FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "base" => Ok(Scenario::Base),
            "bull" => Ok(Scenario::Bull),
            "bear" => Ok(Scenario::Bear),
            other => Err(format!("unknown scenario: {other}")),
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Scenario::Base => "base",
            Scenario::Bull => "bull",
            Scenario::Bear => "bear",
        };
        f.write_str(s)
    }
}

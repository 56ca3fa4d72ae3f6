//! Equity curve types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One simulated trading day on the equity curve.
///
/// Append-only, one per day, strictly date-ordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityCurvePoint {
    /// Trading date
    pub date: NaiveDate,
    /// Total portfolio value (cash + mark-to-market holdings)
    pub value: Decimal,
    /// Benchmark index value scaled to the starting amount, if available
    pub benchmark: Option<Decimal>,
}

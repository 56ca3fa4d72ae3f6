//! Open positions and closed trades.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RecommendationEvent;

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Target price reached, or outcome known to be correct
    TargetHit,
    /// Stop-loss breached, or outcome known to be incorrect
    StopLoss,
    /// Maximum holding period elapsed
    TimeExit,
    /// Force-closed at the end of the simulated range
    StillOpen,
}

/// An open holding inside a replay run.
///
/// Exists only for the duration of a simulation; converted into a
/// [`ClosedTrade`] on exit.
#[derive(Debug, Clone)]
pub struct Position {
    /// Instrument symbol
    pub symbol: String,
    /// Whole shares held
    pub shares: Decimal,
    /// Entry price
    pub buy_price: Decimal,
    /// Entry date
    pub buy_date: NaiveDate,
    /// Trading days held so far
    pub days_held: u32,
    /// The recommendation that opened this position
    pub source: RecommendationEvent,
}

impl Position {
    /// Market value at the given price.
    pub fn value_at(&self, price: Decimal) -> Decimal {
        self.shares * price
    }

    /// Close the position, producing its ledger entry.
    pub fn close(self, sell_date: NaiveDate, sell_price: Decimal, reason: ExitReason) -> ClosedTrade {
        let cost = self.shares * self.buy_price;
        let proceeds = self.shares * sell_price;
        let return_pct = if self.buy_price > Decimal::ZERO {
            (sell_price - self.buy_price) / self.buy_price * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
        ClosedTrade {
            symbol: self.symbol,
            buy_date: self.buy_date,
            buy_price: self.buy_price,
            sell_date,
            sell_price,
            shares: self.shares,
            return_pct,
            profit: proceeds - cost,
            holding_days: self.days_held,
            exit_reason: reason,
        }
    }
}

/// A completed round trip in the trade ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub symbol: String,
    pub buy_date: NaiveDate,
    pub buy_price: Decimal,
    pub sell_date: NaiveDate,
    pub sell_price: Decimal,
    pub shares: Decimal,
    /// Round-trip return percentage
    pub return_pct: Decimal,
    /// Absolute profit in currency units
    pub profit: Decimal,
    /// Trading days between entry and exit
    pub holding_days: u32,
    pub exit_reason: ExitReason,
}

impl ClosedTrade {
    pub fn is_winner(&self) -> bool {
        self.profit > Decimal::ZERO
    }
}

//! Daily close-price series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily close observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date
    pub date: NaiveDate,
    /// Closing price
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// A time-ordered daily close series for one instrument.
///
/// Invariant: dates strictly increasing, close > 0. The series is
/// read-only input to the engines; [`PriceSeries::from_points`]
/// normalizes raw repository output before use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Symbol
    pub symbol: String,
    /// Observations, oldest first
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Create an empty series.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            points: Vec::new(),
        }
    }

    /// Create a series from raw points, sorting and dropping duplicates
    /// and non-positive closes.
    pub fn from_points(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.retain(|p| p.close > 0.0);
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Close on an exact date, if the instrument traded that day.
    pub fn close_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].close)
    }

    /// Close on the given date, falling back to the nearest prior
    /// trading day.
    pub fn close_on_or_before(&self, date: NaiveDate) -> Option<f64> {
        match self.points.binary_search_by_key(&date, |p| p.date) {
            Ok(i) => Some(self.points[i].close),
            Err(0) => None,
            Err(i) => Some(self.points[i - 1].close),
        }
    }

    /// First observation, if any.
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// Most recent observation, if any.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Restrict the series to `[start, end]` inclusive.
    pub fn slice_range(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbol: self.symbol.clone(),
            points: self
                .points
                .iter()
                .filter(|p| p.date >= start && p.date <= end)
                .copied()
                .collect(),
        }
    }

    /// Keep only the most recent `n` observations.
    pub fn tail(&self, n: usize) -> Self {
        let skip = self.points.len().saturating_sub(n);
        Self {
            symbol: self.symbol.clone(),
            points: self.points[skip..].to_vec(),
        }
    }

    /// Daily log returns of consecutive closes.
    pub fn log_returns(&self) -> Vec<f64> {
        self.points
            .windows(2)
            .map(|w| (w[1].close / w[0].close).ln())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn series() -> PriceSeries {
        PriceSeries::from_points(
            "COMI.CA",
            vec![
                PricePoint::new(date("2024-01-02"), 70.0),
                PricePoint::new(date("2024-01-03"), 71.5),
                PricePoint::new(date("2024-01-07"), 69.8),
            ],
        )
    }

    #[test]
    fn test_from_points_normalizes() {
        let s = PriceSeries::from_points(
            "COMI.CA",
            vec![
                PricePoint::new(date("2024-01-03"), 71.5),
                PricePoint::new(date("2024-01-02"), 70.0),
                PricePoint::new(date("2024-01-02"), 70.0),
                PricePoint::new(date("2024-01-04"), -1.0),
            ],
        );
        assert_eq!(s.len(), 2);
        assert_eq!(s.first().unwrap().date, date("2024-01-02"));
    }

    #[test]
    fn test_close_lookup() {
        let s = series();
        assert_eq!(s.close_on(date("2024-01-03")), Some(71.5));
        assert_eq!(s.close_on(date("2024-01-05")), None);
    }

    #[test]
    fn test_nearest_prior_lookup() {
        let s = series();
        // 2024-01-05 is not a trading day; falls back to 01-03
        assert_eq!(s.close_on_or_before(date("2024-01-05")), Some(71.5));
        assert_eq!(s.close_on_or_before(date("2024-01-01")), None);
        assert_eq!(s.close_on_or_before(date("2024-01-07")), Some(69.8));
    }

    #[test]
    fn test_log_returns() {
        let s = series();
        let lr = s.log_returns();
        assert_eq!(lr.len(), 2);
        assert!((lr[0] - (71.5f64 / 70.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn test_tail_and_slice() {
        let s = series();
        assert_eq!(s.tail(2).len(), 2);
        assert_eq!(s.tail(10).len(), 3);
        let sliced = s.slice_range(date("2024-01-03"), date("2024-01-07"));
        assert_eq!(sliced.len(), 2);
    }
}

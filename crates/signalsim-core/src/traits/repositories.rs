//! Repository trait definitions.
//!
//! The engines are pure functions of pre-fetched data; all I/O happens
//! through these traits, once, before a run starts.

use crate::error::DataError;
use crate::types::{InstrumentName, PriceSeries, RecommendationEvent};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Source of daily close-price series.
#[async_trait]
pub trait PriceRepository: Send + Sync {
    /// Fetch the close series for one symbol over an inclusive date range.
    ///
    /// Returns the observations ordered oldest to newest; an empty series
    /// (not an error) when the symbol has no data in range.
    async fn fetch_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError>;

    /// Fetch close series for many symbols in one call.
    ///
    /// Symbols with no data in range may be absent from the map.
    async fn fetch_prices_batch(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<String, PriceSeries>, DataError>;
}

/// Source of dated trade recommendations.
#[async_trait]
pub trait RecommendationRepository: Send + Sync {
    /// Fetch all recommendations issued within an inclusive date range.
    async fn fetch_recommendations(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RecommendationEvent>, DataError>;
}

/// Source of static instrument reference metadata.
#[async_trait]
pub trait InstrumentRepository: Send + Sync {
    /// Fetch display names keyed by symbol.
    async fn fetch_instrument_names(&self) -> Result<HashMap<String, InstrumentName>, DataError>;
}

//! CSV-backed recommendation repository.
//!
//! A single file holding the platform's exported signal history.

use async_trait::async_trait;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

use signalsim_core::{Action, DataError, RecommendationEvent, RecommendationRepository};

use crate::csv_prices::{parse_date, require_file};

/// CSV record format. Optional columns may be left empty.
#[derive(Debug, Deserialize)]
struct RecommendationRecord {
    symbol: String,
    date: String,
    action: String,
    confidence: u8,
    entry_price: f64,
    #[serde(default)]
    stop_loss: Option<f64>,
    #[serde(default)]
    target_price: Option<f64>,
    #[serde(default)]
    was_correct: Option<bool>,
    #[serde(default)]
    next_day_return: Option<f64>,
}

/// Recommendation repository reading one CSV export.
pub struct CsvRecommendationRepository {
    path: PathBuf,
}

impl CsvRecommendationRepository {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, DataError> {
        let path = path.into();
        require_file(&path)?;
        Ok(Self { path })
    }

    fn load_all(&self) -> Result<Vec<RecommendationEvent>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut events = Vec::new();
        for result in reader.deserialize() {
            let record: RecommendationRecord =
                result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let action: Action = record
                .action
                .parse()
                .map_err(|e: String| DataError::ParseError(e))?;
            events.push(RecommendationEvent {
                symbol: record.symbol,
                date: parse_date(&record.date)?,
                action,
                confidence: record.confidence,
                entry_price: record.entry_price,
                stop_loss: record.stop_loss,
                target_price: record.target_price,
                was_correct: record.was_correct,
                next_day_return: record.next_day_return,
            });
        }
        events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.symbol.cmp(&b.symbol)));

        debug!(events = events.len(), path = %self.path.display(), "loaded recommendation csv");
        Ok(events)
    }
}

#[async_trait]
impl RecommendationRepository for CsvRecommendationRepository {
    async fn fetch_recommendations(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RecommendationEvent>, DataError> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|r| r.date >= start && r.date <= end)
            .collect())
    }
}

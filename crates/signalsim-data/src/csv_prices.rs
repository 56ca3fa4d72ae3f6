//! CSV-backed price repository.
//!
//! One file per symbol under a base directory, named `{symbol}.csv`,
//! with `date,close` columns.

use async_trait::async_trait;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use signalsim_core::{DataError, PricePoint, PriceRepository, PriceSeries};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct PriceRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp")]
    date: String,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
}

/// Price repository reading per-symbol CSV files from a directory.
pub struct CsvPriceRepository {
    dir: PathBuf,
}

impl CsvPriceRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DataError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(Self { dir })
    }

    fn load_series(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        let path = self.dir.join(format!("{symbol}.csv"));
        if !path.exists() {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut points = Vec::new();
        for result in reader.deserialize() {
            let record: PriceRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            points.push(PricePoint::new(parse_date(&record.date)?, record.close));
        }

        debug!(%symbol, points = points.len(), path = %path.display(), "loaded price csv");
        Ok(PriceSeries::from_points(symbol, points))
    }
}

#[async_trait]
impl PriceRepository for CsvPriceRepository {
    async fn fetch_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        Ok(self.load_series(symbol)?.slice_range(start, end))
    }

    async fn fetch_prices_batch(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<String, PriceSeries>, DataError> {
        let mut map = HashMap::new();
        for symbol in symbols {
            // A symbol absent on disk is simply absent from the map.
            match self.load_series(symbol) {
                Ok(series) => {
                    map.insert(symbol.clone(), series.slice_range(start, end));
                }
                Err(DataError::SymbolNotFound(_)) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(map)
    }
}

/// Parse the date formats seen in exported platform data.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, DataError> {
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in formats {
        if let Ok(d) = NaiveDate::parse_from_str(raw, format) {
            return Ok(d);
        }
    }
    Err(DataError::ParseError(format!("could not parse date: {raw}")))
}

/// Path check helper shared by the single-file repositories.
pub(crate) fn require_file(path: &Path) -> Result<(), DataError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(DataError::NoDataAvailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, body: &str) {
        let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
        file.write_all(body.as_bytes()).unwrap();
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("2024-01-15").is_ok());
        assert!(parse_date("2024/01/15").is_ok());
        assert!(parse_date("01/15/2024").is_ok());
        assert!(parse_date("15-01-2024").is_ok());
        assert!(parse_date("yesterday").is_err());
    }

    #[tokio::test]
    async fn test_fetch_prices_slices_and_sorts() {
        let dir = TempDir::new().unwrap();
        // Out of order on purpose; the series constructor sorts.
        write_csv(
            &dir,
            "COMI.CA.csv",
            "date,close\n2025-01-06,71.5\n2025-01-02,70.0\n2025-01-07,72.0\n",
        );
        let repo = CsvPriceRepository::new(dir.path()).unwrap();

        let series = repo
            .fetch_prices(
                "COMI.CA",
                "2025-01-02".parse().unwrap(),
                "2025-01-06".parse().unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points[0].close, 70.0);
        assert_eq!(series.points[1].close, 71.5);
    }

    #[tokio::test]
    async fn test_missing_symbol_is_not_found() {
        let dir = TempDir::new().unwrap();
        let repo = CsvPriceRepository::new(dir.path()).unwrap();
        let err = repo
            .fetch_prices(
                "XXXX.CA",
                "2025-01-01".parse().unwrap(),
                "2025-02-01".parse().unwrap(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound(_)));
    }

    #[tokio::test]
    async fn test_batch_skips_missing_symbols() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "COMI.CA.csv", "date,close\n2025-01-02,70.0\n");
        let repo = CsvPriceRepository::new(dir.path()).unwrap();

        let map = repo
            .fetch_prices_batch(
                &["COMI.CA".to_string(), "XXXX.CA".to_string()],
                "2025-01-01".parse().unwrap(),
                "2025-02-01".parse().unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("COMI.CA"));
    }

    #[tokio::test]
    async fn test_capitalized_headers_accepted() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "SWDY.CA.csv", "Date,Close\n2025-01-02,30.5\n");
        let repo = CsvPriceRepository::new(dir.path()).unwrap();
        let series = repo
            .fetch_prices(
                "SWDY.CA",
                "2025-01-01".parse().unwrap(),
                "2025-02-01".parse().unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_missing_directory_rejected() {
        assert!(matches!(
            CsvPriceRepository::new("/nonexistent/prices"),
            Err(DataError::NoDataAvailable)
        ));
    }
}

//! CSV-backed instrument name repository.

use async_trait::async_trait;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use signalsim_core::{DataError, InstrumentName, InstrumentRepository};

use crate::csv_prices::require_file;

/// CSV record format: `symbol,name_primary,name_secondary`.
#[derive(Debug, Deserialize)]
struct InstrumentRecord {
    symbol: String,
    name_primary: String,
    #[serde(default)]
    name_secondary: String,
}

/// Instrument metadata repository reading one CSV file.
pub struct CsvInstrumentRepository {
    path: PathBuf,
}

impl CsvInstrumentRepository {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, DataError> {
        let path = path.into();
        require_file(&path)?;
        Ok(Self { path })
    }
}

#[async_trait]
impl InstrumentRepository for CsvInstrumentRepository {
    async fn fetch_instrument_names(&self) -> Result<HashMap<String, InstrumentName>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut names = HashMap::new();
        for result in reader.deserialize() {
            let record: InstrumentRecord =
                result.map_err(|e| DataError::ParseError(e.to_string()))?;
            names.insert(
                record.symbol,
                InstrumentName {
                    name_primary: record.name_primary,
                    name_secondary: record.name_secondary,
                },
            );
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_fetch_names() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            "symbol,name_primary,name_secondary\n\
             COMI.CA,Commercial International Bank,البنك التجاري الدولي\n\
             SWDY.CA,Elsewedy Electric,السويدي إليكتريك\n"
                .as_bytes(),
        )
        .unwrap();
        let (_, path) = file.keep().unwrap();

        let repo = CsvInstrumentRepository::new(path).unwrap();
        let names = repo.fetch_instrument_names().await.unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(
            names["COMI.CA"].name_primary,
            "Commercial International Bank"
        );
        assert_eq!(names["SWDY.CA"].name_secondary, "السويدي إليكتريك");
    }

    #[test]
    fn test_missing_file_rejected() {
        assert!(matches!(
            CsvInstrumentRepository::new("/nonexistent/names.csv"),
            Err(DataError::NoDataAvailable)
        ));
    }
}

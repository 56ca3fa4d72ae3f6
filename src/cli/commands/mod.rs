//! CLI command implementations.

pub mod backtest;
pub mod forecast;
pub mod validate;

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

use signalsim_config::{AppConfig, DataSettings};
use signalsim_core::{DataError, InstrumentName, InstrumentRepository};
use signalsim_data::CsvInstrumentRepository;

/// Load the config file, falling back to defaults when it is absent.
pub(crate) fn load_or_default(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        signalsim_config::load_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))
    } else {
        Ok(AppConfig::default())
    }
}

/// Names are decorative; runs proceed without them.
struct NoInstruments;

#[async_trait]
impl InstrumentRepository for NoInstruments {
    async fn fetch_instrument_names(&self) -> Result<HashMap<String, InstrumentName>, DataError> {
        Ok(HashMap::new())
    }
}

/// Instrument name repository from config, or an empty stand-in.
pub(crate) fn instrument_repo(data: &DataSettings) -> Arc<dyn InstrumentRepository> {
    match &data.instruments_file {
        Some(path) => match CsvInstrumentRepository::new(path) {
            Ok(repo) => Arc::new(repo),
            Err(err) => {
                warn!(%path, %err, "instrument names unavailable");
                Arc::new(NoInstruments)
            }
        },
        None => Arc::new(NoInstruments),
    }
}

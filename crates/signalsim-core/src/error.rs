//! Error types for the simulation engines.

use thiserror::Error;

/// Top-level simulation error.
#[derive(Error, Debug)]
pub enum SimError {
    /// No prices or recommendations exist for the requested range.
    #[error("No data for the requested range: {0}")]
    NoData(String),

    /// Fewer usable observations than the engine requires.
    #[error("Insufficient history for {symbol}: need {required} points, have {available}")]
    InsufficientHistory {
        symbol: String,
        required: usize,
        available: usize,
    },

    /// Request rejected before any fetch or computation.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),
}

impl SimError {
    /// Stable machine-readable code for API callers.
    pub fn code(&self) -> &'static str {
        match self {
            SimError::NoData(_) => "no_data",
            SimError::InsufficientHistory { .. } => "insufficient_history",
            SimError::Validation(_) => "validation_error",
            SimError::Data(_) => "data_error",
        }
    }
}

/// Data repository errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data source error: {0}")]
    Internal(String),
}

/// Result type alias for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

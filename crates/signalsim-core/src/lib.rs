//! Core types and traits for the signal simulation engines.
//!
//! This crate provides the foundational building blocks including:
//! - Daily price series and recommendation events
//! - Position, closed-trade, and equity-curve types
//! - Validated simulation requests
//! - Repository traits for prices, recommendations, and instrument names

pub mod error;
pub mod request;
pub mod traits;
pub mod types;

pub use error::{DataError, SimError, SimResult};
pub use request::{BacktestRequest, ForecastRequest, SymbolChoice};
pub use traits::*;
pub use types::*;

//! CSV-backed implementations of the repository traits.
//!
//! These adapters read exported platform data from local files so the
//! CLI and tests can run the engines end to end without a live data
//! service.

mod csv_instruments;
mod csv_prices;
mod csv_recommendations;

pub use csv_instruments::CsvInstrumentRepository;
pub use csv_prices::CsvPriceRepository;
pub use csv_recommendations::CsvRecommendationRepository;

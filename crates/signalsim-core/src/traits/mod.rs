//! Collaborator traits consumed by the engines.

mod repositories;

pub use repositories::{InstrumentRepository, PriceRepository, RecommendationRepository};

//! Domain types for the simulation engines.

mod equity;
mod position;
mod price;
mod recommendation;
mod scenario;

pub use equity::EquityCurvePoint;
pub use position::{ClosedTrade, ExitReason, Position};
pub use price::{PricePoint, PriceSeries};
pub use recommendation::{Action, RecommendationEvent};
pub use scenario::Scenario;

use serde::{Deserialize, Serialize};

/// Display names for a listed instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentName {
    /// Primary (Latin) display name
    pub name_primary: String,
    /// Secondary (Arabic) display name
    pub name_secondary: String,
}

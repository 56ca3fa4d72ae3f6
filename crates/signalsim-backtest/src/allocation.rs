//! Confidence-tiered position allocation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One rung of the allocation ladder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AllocationTier {
    /// Minimum normalized confidence (inclusive) for this tier
    pub min_confidence: f64,
    /// Fraction of total portfolio value to allocate
    pub allocation: Decimal,
}

/// Ordered (threshold, allocation) table, evaluated top-down.
///
/// Tiers must be ordered by descending threshold; the last tier should
/// have a zero threshold so every confidence maps to some allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationLadder {
    tiers: Vec<AllocationTier>,
}

impl Default for AllocationLadder {
    fn default() -> Self {
        Self {
            tiers: vec![
                AllocationTier {
                    min_confidence: 0.75,
                    allocation: dec!(0.20),
                },
                AllocationTier {
                    min_confidence: 0.50,
                    allocation: dec!(0.15),
                },
                AllocationTier {
                    min_confidence: 0.0,
                    allocation: dec!(0.10),
                },
            ],
        }
    }
}

impl AllocationLadder {
    /// Create a ladder from explicit tiers, sorted by descending threshold.
    pub fn new(mut tiers: Vec<AllocationTier>) -> Self {
        tiers.sort_by(|a, b| {
            b.min_confidence
                .partial_cmp(&a.min_confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self { tiers }
    }

    /// Allocation fraction for a normalized confidence in [0, 1].
    pub fn allocation_for(&self, normalized_confidence: f64) -> Decimal {
        self.tiers
            .iter()
            .find(|t| normalized_confidence >= t.min_confidence)
            .map(|t| t.allocation)
            .unwrap_or(Decimal::ZERO)
    }
}

//! Screening counters for a research run.

use serde::{Deserialize, Serialize};

use crate::evaluation::Decision;

/// Outcome counts across evaluated candidates.
///
/// Owned by the caller and passed into each evaluation by `&mut`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningStats {
    pub evaluated: u64,
    pub blocked: u64,
    pub no_source: u64,
    pub out_of_stock: u64,
    pub needs_price_check: u64,
    pub below_min_profit: u64,
    pub unprofitable: u64,
    pub accepted: u64,
}

impl ScreeningStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one evaluation under its decision.
    pub fn record(&mut self, decision: &Decision) {
        self.evaluated += 1;
        match decision {
            Decision::Accepted => self.accepted += 1,
            Decision::Blocked { .. } => self.blocked += 1,
            Decision::NoSource => self.no_source += 1,
            Decision::OutOfStock => self.out_of_stock += 1,
            Decision::NeedsPriceCheck => self.needs_price_check += 1,
            Decision::BelowMinProfit { .. } => self.below_min_profit += 1,
            Decision::Unprofitable => self.unprofitable += 1,
        }
    }

    /// Candidates that reached the profit step.
    #[must_use]
    pub fn priced(&self) -> u64 {
        self.below_min_profit + self.unprofitable + self.accepted
    }

    /// Accepted share of evaluated candidates, as a percentage.
    #[must_use]
    pub fn acceptance_rate(&self) -> f64 {
        if self.evaluated == 0 {
            return 0.0;
        }
        self.accepted as f64 / self.evaluated as f64 * 100.0
    }

    /// Resets all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

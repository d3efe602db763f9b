//! Landed profit calculation for an eBay sale sourced in Japan.
//!
//! Revenue is the eBay price plus buyer-paid shipping converted to JPY. The
//! marketplace fee is a percentage of that revenue plus a fixed USD fee
//! converted at the same rate. Cost is the domestic source price plus a flat
//! outbound shipping estimate.
//!
//! ```text
//! eBay:    $60.00 + $10.00 shipping  @ 150 JPY/USD  = 10,500 JPY revenue
//! Fees:    10,500 * 12% + $0.30 * 150              =  1,305 JPY
//! Cost:    2,000 source + 800 shipping              =  2,800 JPY
//! Profit:                                              6,395 JPY (60.90%)
//! ```

use arb_research_core::FeeRuleTable;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::weight::WeightEstimate;

// =============================================================================
// Constants
// =============================================================================

/// A candidate counts as profitable from one yen of profit upwards.
pub const PROFITABLE_THRESHOLD_JPY: Decimal = dec!(1);

/// Weight reported until a real estimate overrides it.
pub const PLACEHOLDER_WEIGHT_KG: Decimal = dec!(0.8);

/// Package size reported until a real estimate overrides it.
pub const PLACEHOLDER_PACKAGE_CM: &str = "30/20/10";

const PROFIT_DECIMALS: u32 = 2;
const MARGIN_DECIMALS: u32 = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfitError {
    /// An intermediate JPY amount exceeded the `Decimal` range.
    #[error("{step} overflowed the decimal range")]
    Overflow { step: &'static str },
}

// =============================================================================
// Results
// =============================================================================

/// Unrounded intermediate amounts, all in JPY except `margin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitBreakdown {
    pub fx_rate: Decimal,
    pub revenue_jpy: Decimal,
    pub fees_jpy: Decimal,
    pub cost_jpy: Decimal,
    pub profit_jpy: Decimal,
    /// Profit over revenue; zero when revenue is zero.
    pub margin: Decimal,
}

impl ProfitBreakdown {
    #[must_use]
    pub fn is_profitable(&self) -> bool {
        self.profit_jpy >= PROFITABLE_THRESHOLD_JPY
    }
}

/// Profit record written to the candidate sheet.
///
/// The `with_rebate` fields mirror the `no_rebate` fields: the export-tax
/// rebate is applied by the spreadsheet, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitResult {
    pub fx_rate: Decimal,
    pub estimated_weight_kg: Decimal,
    /// Package dimensions as `"D/W/H"` in cm.
    pub estimated_pkg_cm: String,
    pub profit_jpy_no_rebate: Decimal,
    pub profit_margin_no_rebate: Decimal,
    pub profit_jpy_with_rebate: Decimal,
    pub profit_margin_with_rebate: Decimal,
    pub is_profitable: bool,
}

impl ProfitResult {
    /// Replaces the placeholder weight and package with a real estimate.
    ///
    /// `size_multiplier` scales the reported dimensions only.
    #[must_use]
    pub fn with_package(mut self, estimate: &WeightEstimate, size_multiplier: f64) -> Self {
        self.estimated_weight_kg = Decimal::from(estimate.applied_weight_g) / dec!(1000);
        self.estimated_pkg_cm = estimate.package_label(size_multiplier);
        self
    }
}

impl From<&ProfitBreakdown> for ProfitResult {
    fn from(breakdown: &ProfitBreakdown) -> Self {
        let profit = breakdown
            .profit_jpy
            .round_dp_with_strategy(PROFIT_DECIMALS, RoundingStrategy::MidpointNearestEven);
        let margin = breakdown
            .margin
            .round_dp_with_strategy(MARGIN_DECIMALS, RoundingStrategy::MidpointNearestEven);

        Self {
            fx_rate: breakdown.fx_rate,
            estimated_weight_kg: PLACEHOLDER_WEIGHT_KG,
            estimated_pkg_cm: PLACEHOLDER_PACKAGE_CM.to_string(),
            profit_jpy_no_rebate: profit,
            profit_margin_no_rebate: margin,
            profit_jpy_with_rebate: profit,
            profit_margin_with_rebate: margin,
            is_profitable: breakdown.is_profitable(),
        }
    }
}

// =============================================================================
// Calculation
// =============================================================================

/// Computes the unrounded profit breakdown.
///
/// Missing fee rule keys fall back to their defaults; zero revenue yields a
/// zero margin.
///
/// # Errors
///
/// Returns [`ProfitError::Overflow`] if any amount leaves the `Decimal`
/// range.
pub fn profit_breakdown(
    ebay_price: Decimal,
    ebay_shipping: Decimal,
    source_price_jpy: Decimal,
    fee_rules: &FeeRuleTable,
) -> Result<ProfitBreakdown, ProfitError> {
    let fx_rate = fee_rules.fx_rate();

    let revenue_jpy = checked("revenue", || {
        ebay_price.checked_add(ebay_shipping)?.checked_mul(fx_rate)
    })?;
    let fees_jpy = checked("fees", || {
        revenue_jpy
            .checked_mul(fee_rules.fee_percent())?
            .checked_add(fee_rules.fee_fixed_usd().checked_mul(fx_rate)?)
    })?;
    let cost_jpy = checked("cost", || source_price_jpy.checked_add(fee_rules.shipping_jpy()))?;
    let profit_jpy = checked("profit", || {
        revenue_jpy.checked_sub(fees_jpy)?.checked_sub(cost_jpy)
    })?;

    let margin = if revenue_jpy.is_zero() {
        Decimal::ZERO
    } else {
        checked("margin", || profit_jpy.checked_div(revenue_jpy))?
    };

    Ok(ProfitBreakdown {
        fx_rate,
        revenue_jpy,
        fees_jpy,
        cost_jpy,
        profit_jpy,
        margin,
    })
}

fn checked(step: &'static str, f: impl FnOnce() -> Option<Decimal>) -> Result<Decimal, ProfitError> {
    f().ok_or(ProfitError::Overflow { step })
}

/// Calculates profit for one candidate.
///
/// Profit is rounded to 2 decimals and margin to 4, half-to-even.
/// `is_profitable` is decided on the unrounded profit.
///
/// # Errors
///
/// Returns [`ProfitError::Overflow`] if any amount leaves the `Decimal`
/// range.
pub fn calculate_profit(
    ebay_price: Decimal,
    ebay_shipping: Decimal,
    source_price_jpy: Decimal,
    fee_rules: &FeeRuleTable,
) -> Result<ProfitResult, ProfitError> {
    profit_breakdown(ebay_price, ebay_shipping, source_price_jpy, fee_rules)
        .map(|breakdown| ProfitResult::from(&breakdown))
}

/// Profit calculator bound to one run's fee rules.
#[derive(Debug, Clone, Default)]
pub struct ProfitCalculator {
    rules: FeeRuleTable,
}

impl ProfitCalculator {
    /// Creates a calculator using default fee rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rules(rules: FeeRuleTable) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn rules(&self) -> &FeeRuleTable {
        &self.rules
    }

    /// # Errors
    ///
    /// See [`profit_breakdown`].
    pub fn breakdown(
        &self,
        ebay_price: Decimal,
        ebay_shipping: Decimal,
        source_price_jpy: Decimal,
    ) -> Result<ProfitBreakdown, ProfitError> {
        profit_breakdown(ebay_price, ebay_shipping, source_price_jpy, &self.rules)
    }

    /// # Errors
    ///
    /// See [`calculate_profit`].
    pub fn calculate(
        &self,
        ebay_price: Decimal,
        ebay_shipping: Decimal,
        source_price_jpy: Decimal,
    ) -> Result<ProfitResult, ProfitError> {
        calculate_profit(ebay_price, ebay_shipping, source_price_jpy, &self.rules)
    }
}

//! Profit and shipping-weight estimation for eBay/Japan arbitrage research.
//!
//! A candidate is an item that sold on eBay (USD) with a cheaper equivalent
//! found at a Japanese retailer (JPY). This crate answers two questions for
//! each candidate:
//!
//! 1. **How heavy is the parcel?** [`weight`] picks a packaging template by
//!    category, scales it by price, and bills the larger of actual and
//!    volumetric weight, capped per category.
//! 2. **Is it worth it?** [`profit`] converts the eBay revenue at the run's
//!    FX rate, subtracts marketplace fees, the source price and outbound
//!    shipping, and flags anything making at least one yen.
//!
//! ```text
//! eBay sale:       $60.00 + $10.00 shipping
//! Source (Rakuten): 2,000 JPY
//!
//! Revenue  10,500 JPY   (70 USD @ 150)
//! Fees     -1,305 JPY   (12% + $0.30)
//! Cost     -2,800 JPY   (2,000 + 800 shipping)
//! Profit    6,395 JPY   (60.90%)
//! ```
//!
//! # Modules
//!
//! - [`profit`]: Fee and FX arithmetic
//! - [`weight`]: Category templates, price tiers, volumetric weight
//! - [`classify`]: Product type detection from listing titles
//! - [`evaluation`]: Per-candidate screening pipeline
//! - [`stats`]: Screening counters
//!
//! # Example
//!
//! ```
//! use arb_research_calculator::{calculate_profit, estimate_weight_from_title};
//! use arb_research_core::FeeRuleTable;
//! use rust_decimal_macros::dec;
//!
//! let weight = estimate_weight_from_title("Pokemon PSA 10 Charizard", 250.0).unwrap();
//! assert!(weight.applied_weight_g <= 400);
//!
//! let profit = calculate_profit(dec!(60), dec!(10), dec!(2000), &FeeRuleTable::default())
//!     .unwrap()
//!     .with_package(&weight, 1.0);
//! assert!(profit.is_profitable);
//! ```

pub mod classify;
pub mod evaluation;
pub mod profit;
pub mod stats;
pub mod weight;

pub use classify::{category_for_title, detect_product_type, ProductType};
pub use evaluation::{CandidateEvaluation, CandidateEvaluator, Decision, EvaluationError};
pub use profit::{
    calculate_profit, profit_breakdown, ProfitBreakdown, ProfitCalculator, ProfitError, ProfitResult,
};
pub use stats::ScreeningStats;
pub use weight::{
    calculate_volumetric_weight, category_profile, estimate_weight_from_keyword,
    estimate_weight_from_price, estimate_weight_from_title, get_applied_weight,
    CategoryWeightProfile, EstimationBasis, PriceTier, WeightBasis, WeightError, WeightEstimate,
};

//! Configuration model for a research run.
//!
//! Every section is optional on disk. Missing fee-rule keys resolve to the
//! literal defaults below at lookup time, so a partial `fee_rules.yaml` never
//! fails a run.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

// =============================================================================
// Fee Rule Defaults
// =============================================================================

/// Default FX rate (JPY per USD).
pub const DEFAULT_FX_RATE: Decimal = dec!(150.0);

/// Default marketplace fee percentage (12%).
pub const DEFAULT_FEE_PERCENT: Decimal = dec!(0.12);

/// Default fixed per-transaction fee in USD.
pub const DEFAULT_FEE_FIXED_USD: Decimal = dec!(0.30);

/// Default flat outbound shipping estimate in JPY.
pub const DEFAULT_SHIPPING_JPY: Decimal = dec!(800);

// =============================================================================
// Application Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fee_rules: FeeRuleTable,
    pub research: ResearchSettings,
    pub categories: CategoryFilter,
}

// =============================================================================
// Fee Rules
// =============================================================================

/// Fee rule table with the `fee_rules.yaml` layout:
///
/// ```yaml
/// fx:
///   default_rate: 150.0
/// fees:
///   default:
///     percent: 0.12
///     fixed: 0.30
/// shipping:
///   default_jpy: 800
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeRuleTable {
    pub fx: FxRules,
    pub fees: FeeSchedule,
    pub shipping: ShippingRules,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxRules {
    /// JPY per USD.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_rate: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    pub default: FeeRate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeRate {
    /// Fee as a fraction of revenue (e.g. 0.12 for 12%).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<Decimal>,

    /// Fixed per-transaction fee in USD.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_jpy: Option<Decimal>,
}

impl FeeRuleTable {
    /// Creates a fully specified fee rule table.
    #[must_use]
    pub fn new(fx_rate: Decimal, percent: Decimal, fixed_usd: Decimal, shipping_jpy: Decimal) -> Self {
        Self {
            fx: FxRules {
                default_rate: Some(fx_rate),
            },
            fees: FeeSchedule {
                default: FeeRate {
                    percent: Some(percent),
                    fixed: Some(fixed_usd),
                },
            },
            shipping: ShippingRules {
                default_jpy: Some(shipping_jpy),
            },
        }
    }

    /// Overrides the FX rate.
    #[must_use]
    pub fn with_fx_rate(mut self, fx_rate: Decimal) -> Self {
        self.fx.default_rate = Some(fx_rate);
        self
    }

    /// Overrides the outbound shipping estimate.
    #[must_use]
    pub fn with_shipping_jpy(mut self, shipping_jpy: Decimal) -> Self {
        self.shipping.default_jpy = Some(shipping_jpy);
        self
    }

    /// FX rate, or [`DEFAULT_FX_RATE`] when absent.
    #[must_use]
    pub fn fx_rate(&self) -> Decimal {
        self.fx.default_rate.unwrap_or(DEFAULT_FX_RATE)
    }

    /// Fee percentage, or [`DEFAULT_FEE_PERCENT`] when absent.
    #[must_use]
    pub fn fee_percent(&self) -> Decimal {
        self.fees.default.percent.unwrap_or(DEFAULT_FEE_PERCENT)
    }

    /// Fixed USD fee, or [`DEFAULT_FEE_FIXED_USD`] when absent.
    #[must_use]
    pub fn fee_fixed_usd(&self) -> Decimal {
        self.fees.default.fixed.unwrap_or(DEFAULT_FEE_FIXED_USD)
    }

    /// Shipping estimate, or [`DEFAULT_SHIPPING_JPY`] when absent.
    #[must_use]
    pub fn shipping_jpy(&self) -> Decimal {
        self.shipping.default_jpy.unwrap_or(DEFAULT_SHIPPING_JPY)
    }
}

// =============================================================================
// Research Settings
// =============================================================================

/// Per-run knobs from the research settings sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchSettings {
    /// Minimum no-rebate profit in JPY. `None` disables the filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_profit_jpy: Option<Decimal>,

    /// Scale applied to reported package dimensions (not to weight).
    pub size_multiplier: f64,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            min_profit_jpy: None,
            size_multiplier: 1.0,
        }
    }
}

impl ResearchSettings {
    /// Sets the minimum profit filter.
    #[must_use]
    pub fn with_min_profit(mut self, min_profit_jpy: Decimal) -> Self {
        self.min_profit_jpy = Some(min_profit_jpy);
        self
    }

    /// Sets the dimension scale.
    #[must_use]
    pub fn with_size_multiplier(mut self, size_multiplier: f64) -> Self {
        self.size_multiplier = size_multiplier;
        self
    }

    /// Checks that the dimension scale is a finite positive number.
    ///
    /// # Errors
    ///
    /// Returns an error for NaN, infinite, zero or negative multipliers.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.size_multiplier.is_finite() || self.size_multiplier <= 0.0 {
            anyhow::bail!(
                "size_multiplier must be a finite positive number, got {}",
                self.size_multiplier
            );
        }
        Ok(())
    }
}

// =============================================================================
// Category Filter
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryFilter {
    /// Listings whose search query contains any of these (case-insensitive)
    /// are dropped before sourcing.
    pub blocked_keywords: Vec<String>,
}

impl CategoryFilter {
    #[must_use]
    pub fn new<I, S>(blocked_keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            blocked_keywords: blocked_keywords.into_iter().map(Into::into).collect(),
        }
    }
}

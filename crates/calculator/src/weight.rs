//! Shipping weight and package dimension estimation.
//!
//! Every estimate starts from a per-category packaging template, scales it by
//! a price tier, and compares the packed (actual) weight with the air-freight
//! volumetric weight `L x W x H / 5000`. The larger of the two is applied,
//! then capped at the category's maximum.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::classify::{category_for_title, detect_product_type};

// =============================================================================
// Constants
// =============================================================================

/// Air-freight volumetric divisor (cm^3 per kg).
pub const VOLUMETRIC_DIVISOR: f64 = 5000.0;

/// Category used when nothing else matches.
pub const DEFAULT_CATEGORY: &str = "default";

/// Categories tried before the full table scan in keyword matching.
pub const KEYWORD_PRIORITY: &[&str] = &[
    "psa",
    "cgc",
    "bgs",
    "promo",
    "booster_box",
    "display",
    "collection",
];

/// Categories that never receive price-tier scaling.
pub const CARD_CATEGORIES: &[&str] = &[
    "psa",
    "cgc",
    "bgs",
    "promo",
    "single",
    "trading_cards",
    "card_game",
    "pokemon",
    "yu-gi-oh",
    "one_piece",
    "tcg",
];

// =============================================================================
// Category Profiles
// =============================================================================

/// Packaging template for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryWeightProfile {
    pub base_weight_g: u32,
    pub packaging_weight_g: u32,
    pub depth_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    /// Ceiling for the applied weight.
    pub max_weight_g: u32,
}

const fn profile(
    base_weight_g: u32,
    packaging_weight_g: u32,
    depth_cm: f64,
    width_cm: f64,
    height_cm: f64,
    max_weight_g: u32,
) -> CategoryWeightProfile {
    CategoryWeightProfile {
        base_weight_g,
        packaging_weight_g,
        depth_cm,
        width_cm,
        height_cm,
        max_weight_g,
    }
}

/// Category table, in keyword scan order.
pub static CATEGORY_WEIGHTS: &[(&str, CategoryWeightProfile)] = &[
    // Graded slabs and single cards
    ("psa", profile(50, 150, 20.0, 15.0, 3.0, 400)),
    ("cgc", profile(50, 150, 20.0, 15.0, 3.0, 400)),
    ("bgs", profile(60, 150, 20.0, 15.0, 3.0, 400)),
    ("promo", profile(10, 90, 18.0, 13.0, 2.0, 300)),
    ("single", profile(10, 90, 18.0, 13.0, 2.0, 300)),
    // Sealed product
    ("booster_box", profile(400, 500, 25.0, 20.0, 10.0, 2000)),
    ("display", profile(500, 500, 30.0, 20.0, 12.0, 2500)),
    ("collection", profile(700, 600, 35.0, 25.0, 12.0, 3000)),
    // Trading cards
    ("trading_cards", profile(100, 200, 20.0, 15.0, 5.0, 500)),
    ("card_game", profile(100, 200, 20.0, 15.0, 5.0, 500)),
    ("pokemon", profile(100, 200, 20.0, 15.0, 5.0, 500)),
    ("yu-gi-oh", profile(100, 200, 20.0, 15.0, 5.0, 500)),
    ("one_piece", profile(100, 200, 20.0, 15.0, 5.0, 500)),
    ("tcg", profile(100, 200, 20.0, 15.0, 5.0, 500)),
    // Figures and models
    ("gundam", profile(500, 800, 35.0, 25.0, 15.0, 3000)),
    ("figure", profile(400, 600, 30.0, 20.0, 20.0, 2500)),
    ("model_kit", profile(600, 800, 40.0, 30.0, 15.0, 3500)),
    // Cosmetics
    ("shiseido", profile(200, 400, 15.0, 10.0, 10.0, 1000)),
    ("senka", profile(150, 300, 12.0, 8.0, 8.0, 800)),
    ("cosmetic", profile(200, 400, 15.0, 10.0, 10.0, 1000)),
    // Knives and tools
    ("knife", profile(300, 500, 35.0, 10.0, 5.0, 1500)),
    ("japanese_knife", profile(400, 600, 40.0, 12.0, 5.0, 1500)),
    // Character goods
    ("hello_kitty", profile(200, 400, 25.0, 20.0, 15.0, 1500)),
    ("sanrio", profile(200, 400, 25.0, 20.0, 15.0, 1500)),
    (DEFAULT_CATEGORY, profile(500, 700, 30.0, 20.0, 15.0, 2000)),
];

const DEFAULT_PROFILE: CategoryWeightProfile = profile(500, 700, 30.0, 20.0, 15.0, 2000);

/// Looks up a category (case-insensitive), falling back to `"default"`.
///
/// Returns the canonical tag alongside the profile.
#[must_use]
pub fn category_profile(category: &str) -> (&'static str, &'static CategoryWeightProfile) {
    let wanted = category.trim().to_lowercase();
    CATEGORY_WEIGHTS
        .iter()
        .find(|(tag, _)| *tag == wanted)
        .or_else(|| CATEGORY_WEIGHTS.iter().find(|(tag, _)| *tag == DEFAULT_CATEGORY))
        .map(|(tag, profile)| (*tag, profile))
        .unwrap_or((DEFAULT_CATEGORY, &DEFAULT_PROFILE))
}

/// Returns true if the category is exempt from price-tier scaling.
#[must_use]
pub fn is_card_category(category: &str) -> bool {
    let wanted = category.trim().to_lowercase();
    CARD_CATEGORIES.iter().any(|tag| *tag == wanted)
}

/// Picks a category by substring match against a search keyword.
///
/// [`KEYWORD_PRIORITY`] is tried first, then every table key in order. The
/// first hit wins; `"default"` when nothing matches.
#[must_use]
pub fn keyword_category(keyword: &str) -> &'static str {
    let keyword = keyword.to_lowercase();

    KEYWORD_PRIORITY
        .iter()
        .copied()
        .chain(CATEGORY_WEIGHTS.iter().map(|(tag, _)| *tag))
        .find(|tag| keyword.contains(tag))
        .unwrap_or(DEFAULT_CATEGORY)
}

// =============================================================================
// Price Tiers
// =============================================================================

/// Dimension multiplier and extra packaging for a price band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceTier {
    pub multiplier: f64,
    pub extra_packaging_g: u32,
}

impl PriceTier {
    /// No scaling, no extra packaging.
    pub const FLAT: Self = Self {
        multiplier: 1.0,
        extra_packaging_g: 0,
    };

    /// Tier for a USD price: >200 large, >100 medium, >50 standard, else small.
    #[must_use]
    pub fn for_price(price_usd: f64) -> Self {
        if price_usd > 200.0 {
            Self {
                multiplier: 1.5,
                extra_packaging_g: 500,
            }
        } else if price_usd > 100.0 {
            Self {
                multiplier: 1.25,
                extra_packaging_g: 300,
            }
        } else if price_usd > 50.0 {
            Self::FLAT
        } else {
            Self {
                multiplier: 0.8,
                extra_packaging_g: 0,
            }
        }
    }
}

// =============================================================================
// Estimation Basis
// =============================================================================

/// Which weight won the actual vs. volumetric comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightBasis {
    Actual,
    Volumetric,
}

impl WeightBasis {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Actual => "actual",
            Self::Volumetric => "volumetric",
        }
    }
}

impl fmt::Display for WeightBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Basis tag recorded with an estimate: `actual`, `volumetric`, or either
/// with a `_capped(Ng)` suffix when the category ceiling was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EstimationBasis {
    pub basis: WeightBasis,
    pub capped_at_g: Option<u32>,
}

impl EstimationBasis {
    #[must_use]
    pub fn is_capped(&self) -> bool {
        self.capped_at_g.is_some()
    }
}

impl fmt::Display for EstimationBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.capped_at_g {
            Some(cap) => write!(f, "{}_capped({cap}g)", self.basis),
            None => write!(f, "{}", self.basis),
        }
    }
}

impl FromStr for EstimationBasis {
    type Err = WeightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WeightError::InvalidBasis(s.to_string());

        let (basis, capped_at_g) = match s.split_once("_capped(") {
            Some((basis, rest)) => {
                let grams = rest
                    .strip_suffix("g)")
                    .and_then(|g| g.parse::<u32>().ok())
                    .ok_or_else(invalid)?;
                (basis, Some(grams))
            }
            None => (s, None),
        };

        let basis = match basis {
            "actual" => WeightBasis::Actual,
            "volumetric" => WeightBasis::Volumetric,
            _ => return Err(invalid()),
        };

        Ok(Self { basis, capped_at_g })
    }
}

impl Serialize for EstimationBasis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EstimationBasis {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeightError {
    /// NaN or infinite price passed by the caller.
    #[error("price must be a finite number, got {0}")]
    NonFinitePrice(f64),

    #[error("unrecognised estimation basis: '{0}'")]
    InvalidBasis(String),
}

// =============================================================================
// Weight Estimate
// =============================================================================

/// Result of a weight estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEstimate {
    /// Category tag whose template was used.
    pub category: String,
    /// Packed weight in grams.
    pub actual_weight_g: u32,
    pub depth_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    pub volumetric_weight_g: u32,
    /// Billed weight: `min(max(actual, volumetric), category cap)`.
    pub applied_weight_g: u32,
    pub estimation_basis: EstimationBasis,
}

impl WeightEstimate {
    /// Applied weight in kilograms.
    #[must_use]
    pub fn applied_weight_kg(&self) -> f64 {
        f64::from(self.applied_weight_g) / 1000.0
    }

    /// Package label `"D/W/H"` in cm, each side scaled by `size_multiplier`.
    #[must_use]
    pub fn package_label(&self, size_multiplier: f64) -> String {
        format!(
            "{}/{}/{}",
            format_cm(self.depth_cm * size_multiplier),
            format_cm(self.width_cm * size_multiplier),
            format_cm(self.height_cm * size_multiplier),
        )
    }
}

fn format_cm(value: f64) -> String {
    let value = round_to(value, 1);
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_grams(value: f64) -> u32 {
    value.round_ties_even().max(0.0) as u32
}

fn estimate(category: &'static str, profile: &CategoryWeightProfile, tier: PriceTier) -> WeightEstimate {
    let m = tier.multiplier;
    let depth = profile.depth_cm * m;
    let width = profile.width_cm * m;
    let height = profile.height_cm * m;

    let packed_g = profile.base_weight_g + profile.packaging_weight_g + tier.extra_packaging_g;
    let actual_weight_g = whole_grams(f64::from(packed_g) * m);
    let volumetric_weight_g = whole_grams(depth * width * height / VOLUMETRIC_DIVISOR * 1000.0);

    let raw_applied = actual_weight_g.max(volumetric_weight_g);
    let applied_weight_g = raw_applied.min(profile.max_weight_g);

    let basis = if volumetric_weight_g > actual_weight_g {
        WeightBasis::Volumetric
    } else {
        WeightBasis::Actual
    };
    let capped_at_g = (raw_applied > profile.max_weight_g).then_some(profile.max_weight_g);

    WeightEstimate {
        category: category.to_string(),
        actual_weight_g,
        depth_cm: round_to(depth, 1),
        width_cm: round_to(width, 1),
        height_cm: round_to(height, 1),
        volumetric_weight_g,
        applied_weight_g,
        estimation_basis: EstimationBasis { basis, capped_at_g },
    }
}

fn ensure_finite(price_usd: f64) -> Result<(), WeightError> {
    if price_usd.is_finite() {
        Ok(())
    } else {
        Err(WeightError::NonFinitePrice(price_usd))
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Estimates weight from a search keyword such as `"Pokemon Japanese"`.
///
/// No price scaling is applied.
#[must_use]
pub fn estimate_weight_from_keyword(keyword: &str) -> WeightEstimate {
    let (category, profile) = category_profile(keyword_category(keyword));
    estimate(category, profile, PriceTier::FLAT)
}

/// Estimates weight from a USD price and a category hint.
///
/// Card categories keep a flat tier at every price.
///
/// # Errors
///
/// Returns [`WeightError::NonFinitePrice`] if `price_usd` is NaN or infinite.
pub fn estimate_weight_from_price(price_usd: f64, category: &str) -> Result<WeightEstimate, WeightError> {
    ensure_finite(price_usd)?;

    let (category, profile) = category_profile(category);
    let tier = if is_card_category(category) {
        PriceTier::FLAT
    } else {
        PriceTier::for_price(price_usd)
    };

    Ok(estimate(category, profile, tier))
}

/// Estimates weight from an eBay title and USD price.
///
/// The title picks the category (see [`category_for_title`]); the rest is
/// [`estimate_weight_from_price`].
///
/// # Errors
///
/// Returns [`WeightError::NonFinitePrice`] if `price_usd` is NaN or infinite.
pub fn estimate_weight_from_title(title: &str, price_usd: f64) -> Result<WeightEstimate, WeightError> {
    let category = category_for_title(title);
    let estimate = estimate_weight_from_price(price_usd, category)?;

    tracing::debug!(
        product_type = %detect_product_type(title),
        category,
        applied_weight_g = estimate.applied_weight_g,
        basis = %estimate.estimation_basis,
        "Weight estimated from title"
    );

    Ok(estimate)
}

// =============================================================================
// Standalone Helpers
// =============================================================================

/// Volumetric weight in kg (`L x W x H / 5000`), rounded to 2 decimals.
#[must_use]
pub fn calculate_volumetric_weight(depth_cm: f64, width_cm: f64, height_cm: f64) -> f64 {
    round_to(depth_cm * width_cm * height_cm / VOLUMETRIC_DIVISOR, 2)
}

/// Picks the billed weight in kg for a packed weight and box dimensions.
///
/// Volumetric wins only when strictly greater, so ties stay `Actual`.
#[must_use]
pub fn get_applied_weight(
    actual_weight_kg: f64,
    depth_cm: f64,
    width_cm: f64,
    height_cm: f64,
) -> (f64, WeightBasis) {
    let volumetric = calculate_volumetric_weight(depth_cm, width_cm, height_cm);

    if volumetric > actual_weight_kg {
        (volumetric, WeightBasis::Volumetric)
    } else {
        (actual_weight_kg, WeightBasis::Actual)
    }
}

//! Product type detection from eBay titles.
//!
//! Titles are matched on lowercase word tokens (split on anything that is
//! not alphanumeric) plus a few multi-word substrings such as `"one piece"`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::weight::DEFAULT_CATEGORY;

/// Grading companies; a token matches when it is the name optionally
/// followed by digits (`psa`, `psa10`).
const GRADING_COMPANIES: &[&str] = &["psa", "cgc", "bgs", "sgc"];

/// Substrings that mark a trading-card title.
const CARD_KEYWORDS: &[&str] = &[
    "card",
    "pokemon",
    "pokémon",
    "yu-gi-oh",
    "yugioh",
    "one piece",
    "tcg",
    "ccg",
    "mtg",
    "magic the gathering",
    "weiss schwarz",
];

/// Tokens that mark sealed or multi-item product.
const BOX_TOKENS: &[&str] = &[
    "box",
    "boxes",
    "booster",
    "boosters",
    "display",
    "case",
    "collection",
    "bundle",
    "lot",
];

/// Franchise refinements, checked in order. Each entry is a category tag and
/// the title substrings that select it.
const FRANCHISE_CATEGORIES: &[(&str, &[&str])] = &[
    ("pokemon", &["pokemon", "pokémon"]),
    ("yu-gi-oh", &["yu-gi-oh", "yugioh"]),
    ("one_piece", &["one piece", "one_piece"]),
    ("gundam", &["gundam", "gunpla"]),
    ("figure", &["figure", "figurine"]),
];

// =============================================================================
// Product Type
// =============================================================================

/// Product shape inferred from a listing title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    /// Slabbed card (PSA/CGC/BGS/SGC).
    GradedCard,
    /// Single raw card, identified by a set number like `025/165` or "promo".
    SingleCard,
    /// Booster box, display, case, bundle or lot.
    Box,
    /// Card-related but not obviously single or sealed.
    GeneralCard,
    General,
}

impl ProductType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GradedCard => "graded_card",
            Self::SingleCard => "single_card",
            Self::Box => "box",
            Self::GeneralCard => "general_card",
            Self::General => "general",
        }
    }

    /// Weight category used before franchise refinement.
    #[must_use]
    pub fn base_category(self) -> &'static str {
        match self {
            Self::GradedCard => "psa",
            Self::SingleCard => "single",
            Self::Box => "booster_box",
            Self::GeneralCard => "trading_cards",
            Self::General => DEFAULT_CATEGORY,
        }
    }

    /// Graded and single cards keep their small-package category even when
    /// the title names a franchise.
    #[must_use]
    pub fn allows_refinement(self) -> bool {
        !matches!(self, Self::GradedCard | Self::SingleCard)
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Detection
// =============================================================================

fn tokens(title: &str) -> Vec<&str> {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect()
}

fn is_grading_token(token: &str) -> bool {
    GRADING_COMPANIES.iter().any(|company| {
        token
            .strip_prefix(company)
            .is_some_and(|grade| grade.chars().all(|c| c.is_ascii_digit()))
    })
}

fn has_card_keyword(title: &str) -> bool {
    CARD_KEYWORDS.iter().any(|keyword| title.contains(keyword))
}

/// Classifies a listing title.
///
/// Rules apply in order: grading token, then set number (`/`) with a card
/// keyword or a promo token, then box tokens, then any card keyword.
#[must_use]
pub fn detect_product_type(title: &str) -> ProductType {
    let lower = title.to_lowercase();
    let tokens = tokens(&lower);
    let is_card = has_card_keyword(&lower);

    if tokens.iter().any(|token| is_grading_token(token)) {
        return ProductType::GradedCard;
    }

    let promo = tokens.iter().any(|token| *token == "promo" || *token == "promos");
    if (lower.contains('/') && is_card) || promo {
        return ProductType::SingleCard;
    }

    if tokens.iter().any(|token| BOX_TOKENS.contains(token)) {
        return ProductType::Box;
    }

    if is_card {
        ProductType::GeneralCard
    } else {
        ProductType::General
    }
}

/// Franchise category named in the title, if any.
#[must_use]
pub fn franchise_category(title: &str) -> Option<&'static str> {
    let lower = title.to_lowercase();
    FRANCHISE_CATEGORIES
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| lower.contains(needle)))
        .map(|(category, _)| *category)
}

/// Weight category for a title: the product type's base category, refined to
/// a franchise when the type allows it.
#[must_use]
pub fn category_for_title(title: &str) -> &'static str {
    let product_type = detect_product_type(title);
    let base = product_type.base_category();

    if !product_type.allows_refinement() {
        return base;
    }

    franchise_category(title).unwrap_or(base)
}
